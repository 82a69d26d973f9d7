use tokio::runtime::Handle;

use super::connection::BackendConnection;
use crate::config::ConnectionDescriptor;
use crate::error::SqlSessionError;

/// The session's connection slot, borrowed for one unit of work.
///
/// Unless the connection belongs to an active transaction it is closed when the
/// checkout ends, including when the future driving the work is dropped before
/// it completes.
pub(super) struct Checkout<'a> {
    slot: &'a mut Option<BackendConnection>,
    keep_open: bool,
}

impl<'a> Checkout<'a> {
    /// Open a connection into `slot` if it is empty.
    pub(super) async fn open(
        slot: &'a mut Option<BackendConnection>,
        descriptor: &ConnectionDescriptor,
        keep_open: bool,
    ) -> Result<Checkout<'a>, SqlSessionError> {
        if slot.is_none() {
            *slot = Some(BackendConnection::open(descriptor).await?);
        }
        Ok(Checkout { slot, keep_open })
    }

    pub(super) fn connection(&mut self) -> Result<&mut BackendConnection, SqlSessionError> {
        self.slot.as_mut().ok_or_else(|| {
            SqlSessionError::ConnectionError("connection slot unexpectedly empty".to_string())
        })
    }

    /// Leave the connection in the slot for the transaction that now owns it.
    pub(super) fn keep(mut self) {
        self.keep_open = true;
    }

    /// Close the connection now unless it is being kept.
    pub(super) async fn release(mut self) {
        if self.keep_open {
            return;
        }
        if let Some(conn) = self.slot.take() {
            match conn.close().await {
                Ok(()) => tracing::debug!("connection closed"),
                Err(e) => tracing::warn!(error = %e, "failed to close connection"),
            }
        }
    }
}

impl Drop for Checkout<'_> {
    fn drop(&mut self) {
        if self.keep_open {
            return;
        }
        if let Some(conn) = self.slot.take() {
            tracing::debug!("unit of work abandoned; discarding its connection");
            close_in_background(conn, false);
        }
    }
}

/// Close `conn` on the current runtime, rolling back first when `rollback` is set.
///
/// Without a runtime the connection is dropped and the engine rolls back.
pub(super) fn close_in_background(mut conn: BackendConnection, rollback: bool) {
    let Ok(handle) = Handle::try_current() else {
        if rollback {
            tracing::warn!("connection with an active transaction dropped outside a runtime");
        }
        return;
    };
    handle.spawn(async move {
        if rollback && let Err(e) = conn.rollback().await {
            tracing::warn!(error = %e, "rollback on drop failed");
        }
        if let Err(e) = conn.close().await {
            tracing::warn!(error = %e, "failed to close connection on drop");
        }
    });
}
