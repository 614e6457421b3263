//! Transport module for talking to the host process
//!
//! This module contains:
//! - The line-delimited JSON channel
//! - Typed request and response messages
//! - The fetch proxy that turns "fetch this URL" into a host round trip

mod channel;
mod messages;
mod proxy;

pub use channel::Channel;
pub use messages::{FetchRequest, ListPage, MessageKind, RecordReply, Request, Response};
pub use proxy::{Emit, Fetch, FetchProxy};

use std::io::{self, StdinLock, StdoutLock};

/// Host proxy bound to the process's standard streams
pub type StdioProxy = FetchProxy<StdinLock<'static>, StdoutLock<'static>>;

/// Binds a fetch proxy to locked stdin/stdout
pub fn stdio_proxy() -> StdioProxy {
    FetchProxy::new(Channel::new(io::stdin().lock(), io::stdout().lock()))
}
