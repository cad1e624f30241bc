// Copyright 2025 Nodegroup Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Nodegroup Common Types
//!
//! Shared building blocks for the server-group admin endpoint and its
//! clients:
//!
//! - [`model`] - Server addresses, table names, group and namespace descriptors
//! - [`protocol`] - Admin requests/responses, JSON-RPC envelope, error taxonomy
//! - [`config`] - Host configuration and the standalone server's TOML config
//! - [`auth`] - Optional API key authentication
//! - [`transport`] - HTTP/JSON-RPC conversion helpers
//!
//! # Example
//!
//! ```
//! use nodegroup_common::model::{Address, GroupInfo};
//!
//! let mut group = GroupInfo::new("batch");
//! group.add_server(Address::from_parts("rs1.example.com", 16020));
//! assert!(group.contains_server(&"rs1.example.com:16020".parse().unwrap()));
//! ```

pub mod auth;
pub mod config;
pub mod model;
pub mod protocol;
pub mod transport;

pub use model::*;
pub use protocol::{GroupAdminError, Result};
