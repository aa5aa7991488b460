use std::{
    io,
    net::SocketAddr,
    path::{Component, Path, PathBuf},
    sync::Arc,
};

use scroller_core::{ConfigSender, Configuration, DepositError};
use tokio::net::{TcpListener, TcpStream, ToSocketAddrs};

use super::{
    headers::content_type, read_request_timeout, HttpError, HttpMethod, HttpResult, Request,
    Response, StatusCode, REQUEST_TIMEOUT,
};

/// HTTP configuration source.
pub struct HttpServer {
    listener: TcpListener,
    handler: Arc<RequestHandler>,
}

impl HttpServer {
    /// Binds the server to the given address.
    ///
    /// Accepted configurations are deposited into the mailbox, static files are served from
    /// the given directory.
    pub async fn bind<A: ToSocketAddrs>(
        address: A,
        mailbox: ConfigSender,
        static_dir: impl Into<PathBuf>,
    ) -> io::Result<Self> {
        let listener = TcpListener::bind(address).await?;
        Ok(Self {
            listener,
            handler: Arc::new(RequestHandler {
                mailbox,
                static_dir: static_dir.into(),
            }),
        })
    }

    /// Returns the local address this server is bound to.
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Runs the accept loop, each connection is served by its own task.
    pub async fn run(self) -> io::Result<()> {
        log::info!("Listening on http://{} ...", self.local_addr()?);
        loop {
            let (stream, peer) = self.listener.accept().await?;
            log::trace!("Accepted an incoming connection from the {peer}");

            let handler = self.handler.clone();
            tokio::spawn(async move {
                if let Err(err) = handler.handle_connection(stream).await {
                    log::debug!("Connection with the {peer} failed: {err}");
                }
            });
        }
    }
}

struct RequestHandler {
    mailbox: ConfigSender,
    static_dir: PathBuf,
}

impl RequestHandler {
    async fn handle_connection(&self, mut stream: TcpStream) -> HttpResult<()> {
        let request = read_request_timeout(&mut stream, REQUEST_TIMEOUT).await;
        let (response, with_body) = match request {
            Ok(request) => {
                let response = self.handle_request(&request).await;
                (response, request.method != HttpMethod::Head)
            }
            Err(HttpError::Parse) => {
                let response = Response::text(StatusCode::BadRequest, "malformed request");
                (response, true)
            }
            Err(err @ (HttpError::HeadersTooLarge | HttpError::BodyTooLarge)) => {
                let response = Response::text(StatusCode::PayloadTooLarge, err.to_string());
                (response, true)
            }
            Err(err) => return Err(err),
        };

        response.write_to(&mut stream, with_body).await?;
        Ok(())
    }

    async fn handle_request(&self, request: &Request) -> Response {
        match (request.method, request.path()) {
            (HttpMethod::Post, "/update") => self.update(&request.body),
            (_, "/update") => Response::text(StatusCode::MethodNotAllowed, "use POST"),
            (HttpMethod::Get | HttpMethod::Head, path) => self.static_file(path).await,
            _ => Response::text(StatusCode::MethodNotAllowed, "method not allowed"),
        }
    }

    fn update(&self, body: &[u8]) -> Response {
        let config: Configuration = match serde_json::from_slice(body) {
            Ok(config) => config,
            Err(err) => {
                log::warn!("Rejected configuration update: {err}");
                return Response::text(
                    StatusCode::BadRequest,
                    format!("invalid configuration: {err}"),
                );
            }
        };

        match self.mailbox.deposit(config) {
            Ok(()) => {
                log::info!("Accepted configuration update {config:?}");
                Response::text(
                    StatusCode::Ok,
                    format!("accepted delay={}", config.delay_millis),
                )
            }
            Err(err @ DepositError::Full(_)) => {
                log::warn!("Configuration update dropped: {err}");
                Response::text(StatusCode::TooManyRequests, err.to_string())
            }
            Err(err @ DepositError::Closed(_)) => {
                log::error!("Configuration update dropped: {err}");
                Response::text(StatusCode::ServiceUnavailable, err.to_string())
            }
        }
    }

    async fn static_file(&self, path: &str) -> Response {
        let relative = path
            .strip_prefix("/static/")
            .unwrap_or_else(|| path.trim_start_matches('/'));
        let relative = if relative.is_empty() || relative.ends_with('/') {
            format!("{relative}index.html")
        } else {
            relative.to_owned()
        };

        let Some(mut file_path) = resolve_static_path(&self.static_dir, &relative) else {
            log::debug!("Refused to serve {path}");
            return Response::text(StatusCode::NotFound, "not found");
        };
        if tokio::fs::metadata(&file_path)
            .await
            .map_or(false, |meta| meta.is_dir())
        {
            file_path.push("index.html");
        }

        match tokio::fs::read(&file_path).await {
            Ok(body) => Response::new(StatusCode::Ok, content_type(&file_path), body),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                Response::text(StatusCode::NotFound, "not found")
            }
            Err(err) => {
                log::debug!("Unable to read {}: {err}", file_path.display());
                Response::text(StatusCode::NotFound, "not found")
            }
        }
    }
}

/// Joins the relative request path to the root, refusing paths that escape it.
fn resolve_static_path(root: &Path, relative: &str) -> Option<PathBuf> {
    let mut path = root.to_path_buf();
    for component in Path::new(relative).components() {
        match component {
            Component::Normal(part) => path.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    Some(path)
}
