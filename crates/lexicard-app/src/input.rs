use std::future::Future;
use std::time::Duration;

use crossterm::event;
use kanal::{AsyncReceiver, AsyncSender};
use lexicard_ui::Key;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Forward terminal input to `tx` from a blocking thread until `cancel`
/// fires or the receiver is gone.
pub fn spawn_key_reader(tx: AsyncSender<Key>, cancel: CancellationToken) -> JoinHandle<()> {
    tokio::task::spawn_blocking(move || {
        let tx = tx.as_sync();
        tracing::debug!("Key reader started");
        while !cancel.is_cancelled() {
            match event::poll(POLL_INTERVAL) {
                Ok(true) => {}
                Ok(false) => continue,
                Err(e) => {
                    tracing::error!("Terminal poll failed: {e}");
                    break;
                }
            }

            let key = match event::read() {
                Ok(event) => Key::from_event(event),
                Err(e) => {
                    tracing::error!("Terminal read failed: {e}");
                    break;
                }
            };
            let Some(key) = key else {
                continue;
            };
            if tx.send(key).is_err() {
                break;
            }
        }
        tracing::debug!("Key reader stopped");
    })
}

/// Drive `work` to completion unless an interrupt key arrives first.
/// Other keys received meanwhile are dropped, except a resize, which is
/// handed back through `resized`.
pub async fn interruptible<F>(
    work: F,
    keys: &AsyncReceiver<Key>,
    resized: &mut Option<(u16, u16)>,
) -> Option<F::Output>
where
    F: Future,
{
    tokio::pin!(work);
    loop {
        tokio::select! {
            output = &mut work => return Some(output),
            key = keys.recv() => match key {
                Ok(key) if key.is_interrupt() => {
                    tracing::info!("Interrupted by {key:?}");
                    return None;
                }
                Ok(Key::Resize(width, height)) => *resized = Some((width, height)),
                Ok(key) => tracing::debug!("Dropped {key:?} while busy"),
                Err(_) => return Some(work.await),
            },
        }
    }
}
