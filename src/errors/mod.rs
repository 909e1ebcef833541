mod rpc_error;
mod sync_error;
mod template_error;

pub use rpc_error::{ErrorCode, RpcError};
pub use sync_error::{SyncError, SyncErrorKind};
pub use template_error::TemplateError;
