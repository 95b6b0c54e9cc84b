//! Development server with live reload

use anyhow::Result;
use axum::{
    body::Body,
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    http::{Request, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use notify::RecursiveMode;
use notify_debouncer_mini::new_debouncer;
use percent_encoding::percent_decode_str;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tower_http::services::ServeDir;

use crate::config::DEFAULT_CONFIG_FILE;
use crate::theme::LAYOUTS_DIR;
use crate::{BuildOptions, Folio};

/// Websocket endpoint the injected script connects to
const LIVE_RELOAD_PATH: &str = "/__livereload";

/// Script inserted before `</body>` of every served HTML page
const LIVE_RELOAD_SCRIPT: &str = r#"
<script>
(function() {
  var socket = new WebSocket('ws://' + location.host + '/__livereload');
  socket.onmessage = function(event) {
    if (event.data === 'reload') location.reload();
  };
  socket.onclose = function() {
    setTimeout(function() { location.reload(); }, 1000);
  };
})();
</script>
"#;

/// Server state
struct ServerState {
    output_dir: PathBuf,
    reload_tx: broadcast::Sender<()>,
}

/// Serve the output directory of an already built site.
///
/// Changes under the site's content, layouts, themes, assets and config files
/// trigger a full reload and rebuild on a watcher thread; connected browsers
/// reload once the rebuild succeeds.
pub async fn start(
    folio: &Folio,
    options: BuildOptions,
    host: &str,
    port: u16,
    open: bool,
) -> Result<()> {
    let (reload_tx, _) = broadcast::channel::<()>(16);

    let state = Arc::new(ServerState {
        output_dir: folio.output_dir.clone(),
        reload_tx: reload_tx.clone(),
    });

    let app = Router::new()
        .route(LIVE_RELOAD_PATH, get(livereload_handler))
        .fallback(fallback_handler)
        .with_state(state);

    let bind_host = if host == "localhost" { "127.0.0.1" } else { host };
    let addr: SocketAddr = format!("{}:{}", bind_host, port).parse()?;

    let url = format!("http://{}:{}", host, port);
    println!("Server running at {}", url);
    println!("Live reload enabled. Watching for changes...");
    println!("Press Ctrl+C to stop.");

    if open {
        if let Err(e) = open_browser(&url) {
            tracing::warn!("Failed to open browser: {}", e);
        }
    }

    let targets = watch_targets(folio, &options);
    let site_dir = folio.site_dir.clone();
    let output_dir = folio.output_dir.clone();
    std::thread::spawn(move || {
        if let Err(e) = watch_and_rebuild(targets, site_dir, output_dir, options, reload_tx) {
            tracing::error!("File watcher error: {}", e);
        }
    });

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Paths the dev server watches, with their recursion mode
pub fn watch_targets(folio: &Folio, options: &BuildOptions) -> Vec<(PathBuf, RecursiveMode)> {
    let site_dir = &folio.site_dir;
    let dirs = &folio.config.content.directories;

    let mut targets: Vec<(PathBuf, RecursiveMode)> = Vec::new();
    let mut push = |path: PathBuf, mode: RecursiveMode| {
        if path.exists() && !targets.iter().any(|(p, _)| *p == path) {
            targets.push((path, mode));
        }
    };

    for dir in [&dirs.posts, &dirs.pages, &dirs.projects] {
        push(site_dir.join(dir), RecursiveMode::Recursive);
    }
    push(site_dir.join(LAYOUTS_DIR), RecursiveMode::Recursive);
    push(folio.theme.theme_dir().to_path_buf(), RecursiveMode::Recursive);
    for asset_dir in &folio.config.build.assets {
        push(site_dir.join(asset_dir), RecursiveMode::Recursive);
    }

    if options.config_files.is_empty() {
        push(site_dir.join(DEFAULT_CONFIG_FILE), RecursiveMode::NonRecursive);
    }
    for file in options.config_files.iter().chain(&options.style_files) {
        push(file.clone(), RecursiveMode::NonRecursive);
    }

    targets
}

/// Editor droppings and VCS files never trigger a rebuild
fn is_relevant(path: &Path, output_dir: &Path) -> bool {
    let path_str = path.to_string_lossy();
    !path.starts_with(output_dir)
        && !path_str.contains(".git")
        && !path_str.contains(".DS_Store")
        && !path_str.contains("node_modules")
        && !path_str.ends_with('~')
        && !path_str.ends_with(".swp")
}

/// Watch for file changes, rebuild and trigger reload
fn watch_and_rebuild(
    targets: Vec<(PathBuf, RecursiveMode)>,
    site_dir: PathBuf,
    output_dir: PathBuf,
    options: BuildOptions,
    reload_tx: broadcast::Sender<()>,
) -> Result<()> {
    let (tx, rx) = std::sync::mpsc::channel();

    // Events arriving during a rebuild are coalesced into the next batch
    let mut debouncer = new_debouncer(Duration::from_millis(500), tx)?;

    for (path, mode) in &targets {
        debouncer.watcher().watch(path, *mode)?;
        tracing::debug!("Watching: {:?}", path);
    }

    loop {
        match rx.recv() {
            Ok(Ok(events)) => {
                let changed: Vec<_> = events
                    .iter()
                    .filter(|e| is_relevant(&e.path, &output_dir))
                    .collect();

                if changed.is_empty() {
                    continue;
                }

                for event in &changed {
                    tracing::info!("File changed: {}", event.path.display());
                }

                tracing::info!("Rebuilding...");
                match Folio::open(&site_dir, &options).and_then(|folio| folio.build()) {
                    Ok(summary) => {
                        tracing::info!("Rebuilt {} pages", summary.total_pages());
                        let _ = reload_tx.send(());
                    }
                    Err(e) => {
                        tracing::error!("Rebuild failed: {:#}", e);
                    }
                }
            }
            Ok(Err(e)) => {
                tracing::error!("Watch error: {:?}", e);
            }
            Err(e) => {
                tracing::error!("Channel error: {:?}", e);
                break;
            }
        }
    }

    Ok(())
}

/// WebSocket handler for live reload
async fn livereload_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<ServerState>>,
) -> impl IntoResponse {
    let reload_rx = state.reload_tx.subscribe();
    ws.on_upgrade(move |socket| handle_livereload_socket(socket, reload_rx))
}

/// Handle WebSocket connection for live reload
async fn handle_livereload_socket(mut socket: WebSocket, mut reload_rx: broadcast::Receiver<()>) {
    tracing::debug!("Live reload client connected");

    loop {
        tokio::select! {
            // Wait for reload signal
            result = reload_rx.recv() => {
                match result {
                    Ok(_) => {
                        if socket.send(Message::Text("reload".to_string())).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                    Err(broadcast::error::RecvError::Lagged(_)) => continue,
                }
            }
            // Handle incoming messages (ping/pong)
            msg = socket.recv() => {
                match msg {
                    Some(Ok(Message::Ping(data))) => {
                        if socket.send(Message::Pong(data)).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    _ => {}
                }
            }
        }
    }

    tracing::debug!("Live reload client disconnected");
}

/// Serve a file from the output tree; HTML gets the live reload script
async fn fallback_handler(
    State(state): State<Arc<ServerState>>,
    request: Request<Body>,
) -> Response {
    let Some(file_path) = resolve_request_path(&state.output_dir, request.uri().path()) else {
        return (StatusCode::NOT_FOUND, "Not found").into_response();
    };

    let is_html = file_path
        .extension()
        .map(|ext| ext == "html" || ext == "htm")
        .unwrap_or(false);

    if !is_html {
        let mut service = ServeDir::new(&state.output_dir);
        return match service.try_call(request).await {
            Ok(response) => response.into_response(),
            Err(e) => {
                tracing::error!("Failed to serve {:?}: {}", file_path, e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response()
            }
        };
    }

    match tokio::fs::read_to_string(&file_path).await {
        Ok(content) => Html(inject_live_reload(&content)).into_response(),
        Err(_) => (StatusCode::NOT_FOUND, "Not found").into_response(),
    }
}

/// Map a request path onto the output tree.
///
/// Directories resolve to their `index.html` and `/a/b` also tries
/// `/a/b.html` so flat permalinks work. `None` for paths escaping the tree.
fn resolve_request_path(output_dir: &Path, request_path: &str) -> Option<PathBuf> {
    let decoded = percent_decode_str(request_path).decode_utf8_lossy();
    if decoded.split('/').any(|segment| segment == "..") {
        return None;
    }

    let relative = decoded.trim_matches('/');
    let candidate = output_dir.join(relative);
    if candidate.is_dir() {
        return Some(candidate.join("index.html"));
    }
    if !candidate.exists() {
        let with_html = output_dir.join(format!("{}.html", relative));
        if with_html.is_file() {
            return Some(with_html);
        }
    }
    Some(candidate)
}

/// Insert the reload script before the last `</body>`, or append it
fn inject_live_reload(html: &str) -> String {
    match html.rfind("</body>") {
        Some(pos) => format!("{}{}{}", &html[..pos], LIVE_RELOAD_SCRIPT, &html[pos..]),
        None => format!("{}{}", html, LIVE_RELOAD_SCRIPT),
    }
}

/// Open a URL in the default browser
fn open_browser(url: &str) -> Result<()> {
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open").arg(url).spawn()?;
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open").arg(url).spawn()?;
    }

    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/c", "start", url])
            .spawn()?;
    }

    Ok(())
}
