//! Changelog server with live reload

use anyhow::Result;
use axum::{
    extract::{
        ws::{Message, WebSocket},
        RawQuery, State, WebSocketUpgrade,
    },
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use notify::RecursiveMode;
use notify_debouncer_mini::new_debouncer;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tokio::sync::broadcast;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::commands::render::render_page;
use crate::templates::TemplateRenderer;
use crate::{Changelog, SiteAggregator, CONFIG_FILE};

/// Live reload script injected into HTML pages
const LIVE_RELOAD_SCRIPT: &str = r#"
<script>
(function() {
    var ws = new WebSocket('ws://' + location.host + '/__livereload');
    ws.onmessage = function(msg) {
        if (msg.data === 'reload') {
            location.reload();
        }
    };
    ws.onclose = function() {
        console.log('Live reload disconnected. Attempting to reconnect...');
        setTimeout(function() { location.reload(); }, 1000);
    };
})();
</script>
</body>
"#;

/// Everything needed to render a page; rebuilt when `_config.yml` changes
struct Site {
    app: Changelog,
    aggregator: SiteAggregator,
    templates: TemplateRenderer,
}

impl Site {
    fn load(app: Changelog) -> Result<Self> {
        Ok(Self {
            aggregator: app.aggregator(),
            templates: TemplateRenderer::new()?,
            app,
        })
    }
}

/// Server state
struct ServerState {
    site: RwLock<Arc<Site>>,
    reload_tx: broadcast::Sender<()>,
    live_reload: bool,
}

impl ServerState {
    fn site(&self) -> Arc<Site> {
        match self.site.read() {
            Ok(site) => site.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn replace_site(&self, site: Site) {
        let mut guard = match self.site.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *guard = Arc::new(site);
    }
}

/// Start the server
pub async fn start(app: &Changelog, ip: &str, port: u16, watch: bool) -> Result<()> {
    // Create broadcast channel for live reload notifications
    let (reload_tx, _) = broadcast::channel::<()>(16);

    let state = Arc::new(ServerState {
        site: RwLock::new(Arc::new(Site::load(app.clone())?)),
        reload_tx,
        live_reload: watch,
    });

    let app_router = router(state.clone(), app.public_dir.clone());

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("Server running at http://{}:{}", ip, port);
    if watch {
        println!("Live reload enabled. Watching for changes...");
    }
    println!("Press Ctrl+C to stop.");

    // Start file watcher if watch mode is enabled
    if watch {
        let content_dir = app.content_dir.clone();
        let base_dir = app.base_dir.clone();
        let state = state.clone();

        tokio::task::spawn_blocking(move || {
            if let Err(e) = watch_and_reload(content_dir, base_dir, state) {
                tracing::error!("File watcher error: {}", e);
            }
        });
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app_router).await?;

    Ok(())
}

fn router(state: Arc<ServerState>, public_dir: PathBuf) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/__livereload", get(livereload_handler))
        .fallback_service(ServeDir::new(public_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Timeline page, rendered from the content directory on every request
async fn index_handler(
    State(state): State<Arc<ServerState>>,
    RawQuery(query): RawQuery,
) -> Response {
    let site = state.site();
    let rendered = tokio::task::spawn_blocking(move || {
        render_page(&site.app, &site.aggregator, &site.templates, query.as_deref())
    })
    .await;

    match rendered {
        Ok(Ok(html)) if state.live_reload => Html(inject_live_reload(&html)).into_response(),
        Ok(Ok(html)) => Html(html).into_response(),
        Ok(Err(e)) => {
            tracing::error!("Failed to render changelog: {:#}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to render changelog").into_response()
        }
        Err(e) => {
            tracing::error!("Render task failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response()
        }
    }
}

/// What a changed path means for the running site
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Change {
    Content,
    Config,
}

/// Classify a watcher event path; `None` for paths the site doesn't read
fn classify_change(path: &Path, content_dir: &Path, config_path: &Path) -> Option<Change> {
    let path_str = path.to_string_lossy();
    if path_str.contains(".git") || path_str.contains(".DS_Store") || path_str.ends_with('~') {
        return None;
    }

    if path == config_path {
        Some(Change::Config)
    } else if path.starts_with(content_dir) {
        Some(Change::Content)
    } else {
        None
    }
}

/// Watch content and config for changes and notify browsers
fn watch_and_reload(
    content_dir: PathBuf,
    base_dir: PathBuf,
    state: Arc<ServerState>,
) -> Result<()> {
    // Event paths are absolute and resolved, so compare against resolved paths
    let base_dir = base_dir.canonicalize().unwrap_or(base_dir);
    let content_dir = content_dir.canonicalize().unwrap_or(content_dir);
    let config_path = base_dir.join(CONFIG_FILE);

    let (tx, rx) = std::sync::mpsc::channel();

    // Create debouncer to avoid reloading on every write of a save burst
    let mut debouncer = new_debouncer(Duration::from_millis(500), tx)?;

    if content_dir.exists() {
        debouncer
            .watcher()
            .watch(&content_dir, RecursiveMode::Recursive)?;
        tracing::debug!("Watching: {:?}", content_dir);
    }

    // The config file is matched by name inside its directory so saves that
    // replace the file by rename are still seen
    debouncer
        .watcher()
        .watch(&base_dir, RecursiveMode::NonRecursive)?;
    tracing::debug!("Watching: {:?}", config_path);

    loop {
        match rx.recv() {
            Ok(Ok(events)) => {
                let changes: Vec<Change> = events
                    .iter()
                    .filter_map(|e| {
                        let change = classify_change(&e.path, &content_dir, &config_path)?;
                        tracing::info!("File changed: {}", e.path.display());
                        Some(change)
                    })
                    .collect();

                if changes.is_empty() {
                    continue;
                }

                if changes.contains(&Change::Config) {
                    match Changelog::new(&base_dir).and_then(Site::load) {
                        Ok(site) => {
                            state.replace_site(site);
                            tracing::info!("Reloaded configuration");
                        }
                        Err(e) => {
                            tracing::error!("Keeping previous configuration: {:#}", e);
                            continue;
                        }
                    }
                }

                // No receivers just means no browser is connected
                let _ = state.reload_tx.send(());
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

/// Inject live reload script into HTML content
fn inject_live_reload(html: &str) -> String {
    if html.contains("</body>") {
        html.replacen("</body>", LIVE_RELOAD_SCRIPT, 1)
    } else {
        format!("{}{}", html, LIVE_RELOAD_SCRIPT)
    }
}
