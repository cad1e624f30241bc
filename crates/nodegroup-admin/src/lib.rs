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

//! Nodegroup Admin Endpoint
//!
//! The control surface for server groups: the admin command facade, the
//! lifecycle guard the host cluster manager calls into, and one-time
//! bootstrap of the shared coordinator. The HTTP server exposes the facade
//! as JSON-RPC.

pub mod controller;
pub mod coordinator;
pub mod directory;
pub mod endpoint;
pub mod events;
pub mod facade;
pub mod guard;
pub mod host;
pub mod http_router;
pub mod http_server;
pub mod initializer;
pub mod observer;

pub use controller::CallController;
pub use coordinator::{DirectoryCoordinator, GroupAdminCoordinator};
pub use directory::{DirectoryBatch, GroupDirectory, InMemoryGroupDirectory};
pub use endpoint::GroupAdminEndpoint;
pub use events::{apply_event, ClusterEvent};
pub use facade::AdminFacade;
pub use guard::LifecycleGuard;
pub use host::{HostServices, StandaloneHost};
pub use http_server::HttpServer;
pub use initializer::{check_balancer, CoordinatorCell};
pub use observer::MasterObserver;
