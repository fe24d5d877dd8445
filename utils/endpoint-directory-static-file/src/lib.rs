/********************************************************************************
 * Copyright (c) 2024 Contributors to the Eclipse Foundation
 *
 * See the NOTICE file(s) distributed with this work for additional
 * information regarding copyright ownership.
 *
 * This program and the accompanying materials are made available under the
 * terms of the Apache License Version 2.0 which is available at
 * https://www.apache.org/licenses/LICENSE-2.0
 *
 * SPDX-License-Identifier: Apache-2.0
 ********************************************************************************/

//! [`EndpointDirectory`] reading endpoint records from a JSON file.
//!
//! The file holds an object with an `endpoints` array of
//! [`EndpointDescriptor`] records. Records that do not deserialize are logged
//! and skipped so one bad entry does not hide the rest of the directory.

use async_trait::async_trait;
use sca_binder::assembly::EndpointDescriptor;
use sca_binder::error::DirectoryError;
use sca_binder::registry::EndpointDirectory;
use serde_json::Value;
use std::fs::{self, canonicalize};
use std::path::PathBuf;
use tracing::{debug, error, warn};

pub struct EndpointDirectoryStaticFile {
    static_file: String,
}

impl EndpointDirectoryStaticFile {
    pub fn new(static_file: String) -> Self {
        EndpointDirectoryStaticFile { static_file }
    }

    fn unavailable(&self, reason: String) -> DirectoryError {
        DirectoryError::Unavailable {
            directory: self.static_file.clone(),
            reason,
        }
    }

    fn malformed(&self, reason: String) -> DirectoryError {
        DirectoryError::Malformed {
            directory: self.static_file.clone(),
            reason,
        }
    }
}

#[async_trait]
impl EndpointDirectory for EndpointDirectoryStaticFile {
    async fn fetch_endpoints(&self) -> Result<Vec<EndpointDescriptor>, DirectoryError> {
        let endpoint_json_file = PathBuf::from(self.static_file.clone());
        debug!("endpoint_json_file: {endpoint_json_file:?}");

        let endpoint_json_file = canonicalize(endpoint_json_file)
            .map_err(|e| self.unavailable(format!("static endpoint file not found: {e}")))?;

        let data = fs::read_to_string(&endpoint_json_file)
            .map_err(|e| self.unavailable(format!("unable to read file: {e}")))?;

        let res: Value = serde_json::from_str(&data)
            .map_err(|e| self.malformed(format!("unable to parse JSON: {e}")))?;

        let Some(records) = res.get("endpoints").and_then(Value::as_array) else {
            return Err(self.malformed("missing `endpoints` array".to_string()));
        };

        let mut descriptors = Vec::with_capacity(records.len());
        for (index, record) in records.iter().enumerate() {
            match serde_json::from_value::<EndpointDescriptor>(record.clone()) {
                Ok(descriptor) => {
                    debug!(
                        "endpoint record {index}: {}/{}",
                        descriptor.component_uri, descriptor.service
                    );
                    descriptors.push(descriptor);
                }
                Err(err) => {
                    error!("Error deserializing endpoint record {index}: {err}");
                }
            }
        }

        if descriptors.is_empty() && !records.is_empty() {
            warn!(
                "No usable endpoint records in {}",
                endpoint_json_file.display()
            );
        }
        debug!("Finished reading {} endpoint records", descriptors.len());
        Ok(descriptors)
    }
}
