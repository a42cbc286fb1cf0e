use crate::host::{self, CallRequest, WalkResponse};
use crate::{render_walk, Error, RenderParameters, Result, WalkConfig, WalkImage};
use serde_json::Value;
use std::sync::mpsc::{self, Sender};
use std::thread;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::oneshot;

enum Command {
    Render(RenderParameters, oneshot::Sender<Result<WalkImage>>),
    Call(String, Vec<Value>, oneshot::Sender<WalkResponse>),
    Close(oneshot::Sender<()>),
}

/// An async-friendly render service backed by a dedicated worker thread.
///
/// Renders are CPU-bound and synchronous; the worker runs them one at a time
/// so concurrent async callers never share a canvas and never block the
/// runtime. Each caller gets its result over its own oneshot channel.
#[derive(Clone)]
pub struct WalkService {
    cmd_tx: Sender<Command>,
}

impl WalkService {
    /// Spawn the worker thread. `config` applies to [`WalkService::render`];
    /// [`WalkService::call`] goes through the host registry.
    pub fn new(config: WalkConfig) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel::<Command>();

        thread::spawn(move || {
            while let Ok(cmd) = cmd_rx.recv() {
                match cmd {
                    Command::Render(params, resp) => {
                        let _ = resp.send(render_walk(&params, &config));
                    }
                    Command::Call(name, args, resp) => {
                        let _ = resp.send(host::invoke(&name, &args));
                    }
                    Command::Close(resp) => {
                        let _ = resp.send(());
                        break;
                    }
                }
            }
            log::debug!("walk service worker exiting");
        });

        Self { cmd_tx }
    }

    /// Render a walk on the worker thread.
    pub async fn render(&self, params: RenderParameters) -> Result<WalkImage> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Render(params, tx))
            .map_err(|_| Error::Other("walk service is closed".into()))?;
        rx.await
            .map_err(|e| Error::Other(format!("Render canceled: {}", e)))?
    }

    /// Invoke a registered host function on the worker thread.
    pub async fn call(&self, name: &str, args: Vec<Value>) -> WalkResponse {
        let (tx, rx) = oneshot::channel();
        if self
            .cmd_tx
            .send(Command::Call(name.to_string(), args, tx))
            .is_err()
        {
            return WalkResponse::failure(&Error::Other("walk service is closed".into()));
        }
        match rx.await {
            Ok(resp) => resp,
            Err(e) => WalkResponse::failure(&Error::Other(format!("Call canceled: {}", e))),
        }
    }

    /// Answer newline-delimited JSON requests from `input` until it ends,
    /// writing one response line per request to `output`.
    ///
    /// Blank lines are skipped and malformed lines get an `{"error": ..}`
    /// response. Transport failures end the loop with [`Error::Io`].
    /// Returns the number of requests answered.
    pub async fn serve_lines<R, W>(&self, input: R, output: &mut W) -> Result<usize>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = input.lines();
        let mut answered = 0;
        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }
            let response = match serde_json::from_str::<CallRequest>(&line) {
                Ok(req) => self.call(&req.call, req.args).await,
                Err(e) => WalkResponse::failure(&Error::from(e)),
            };
            let mut js = serde_json::to_string(&response)?;
            js.push('\n');
            output.write_all(js.as_bytes()).await?;
            output.flush().await?;
            answered += 1;
        }
        Ok(answered)
    }

    /// Stop the worker once queued commands have run.
    pub async fn close(self) -> Result<()> {
        let (tx, rx) = oneshot::channel();
        let _ = self.cmd_tx.send(Command::Close(tx));
        rx.await
            .map_err(|e| Error::Other(format!("Close canceled: {}", e)))
    }
}
