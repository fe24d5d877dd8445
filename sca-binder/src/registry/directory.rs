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

use crate::assembly::EndpointDescriptor;
use crate::error::DirectoryError;
use async_trait::async_trait;

/// Source of endpoints published by other nodes of the domain.
#[async_trait]
pub trait EndpointDirectory: Send + Sync {
    async fn fetch_endpoints(&self) -> Result<Vec<EndpointDescriptor>, DirectoryError>;
}
