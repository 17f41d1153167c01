use once_cell::sync::Lazy;
use reqwest::Client;
use serde::Deserialize;
use std::net::TcpListener;
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;

#[derive(Debug, Deserialize)]
struct ChartPayload {
    labels: Vec<String>,
    datasets: Vec<ChartDataset>,
}

#[derive(Debug, Deserialize)]
struct ChartDataset {
    label: String,
    data: Vec<u32>,
    kind: String,
}

#[derive(Debug, Deserialize)]
struct CalendarGrid {
    headers: Vec<String>,
    leading_blanks: u32,
    cells: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct TeamMemberSummary {
    name: String,
    share_percent: String,
}

#[derive(Debug, Deserialize)]
struct DashboardResponse {
    company: String,
    total_collected: u32,
    total_pending: i64,
    total_assets: u32,
    percent_complete: String,
    last_update: String,
    team: Vec<TeamMemberSummary>,
    line_chart: ChartPayload,
    bar_chart: ChartPayload,
    calendar: CalendarGrid,
}

struct TestServer {
    base_url: String,
    child: Child,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

static TEST_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));
static SERVER: Lazy<Mutex<Option<Arc<TestServer>>>> = Lazy::new(|| Mutex::new(None));

#[cfg(unix)]
mod cleanup {
    use std::sync::atomic::{AtomicI32, Ordering};
    use std::sync::Once;

    static REGISTER: Once = Once::new();
    static PID: AtomicI32 = AtomicI32::new(0);

    pub fn register(pid: u32) {
        REGISTER.call_once(|| {
            PID.store(pid as i32, Ordering::SeqCst);
            unsafe {
                libc::atexit(on_exit);
            }
        });
    }

    extern "C" fn on_exit() {
        let pid = PID.load(Ordering::SeqCst);
        if pid > 0 {
            unsafe {
                libc::kill(pid, libc::SIGTERM);
            }
        }
    }
}

fn pick_free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind random port");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

async fn wait_until_ready(base_url: &str) {
    let client = Client::new();
    let deadline = Instant::now() + Duration::from_secs(5);
    loop {
        if let Ok(resp) = client.get(format!("{base_url}/healthz")).send().await {
            if resp.status().is_success() {
                return;
            }
        }
        if Instant::now() > deadline {
            panic!("server did not become ready");
        }
        sleep(Duration::from_millis(100)).await;
    }
}

async fn spawn_server() -> TestServer {
    let port = pick_free_port();
    let child = Command::new(env!("CARGO_BIN_EXE_asset_dashboard"))
        .env("PORT", port.to_string())
        // Point at a path that does not exist so the built-in defaults apply.
        .env("DASHBOARD_CONFIG", "/nonexistent/dashboard.toml")
        .env("RUST_LOG", "info")
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .expect("failed to spawn server");

    #[cfg(unix)]
    cleanup::register(child.id());

    let base_url = format!("http://127.0.0.1:{port}");
    wait_until_ready(&base_url).await;

    TestServer { base_url, child }
}

async fn shared_server() -> Arc<TestServer> {
    let mut guard = SERVER.lock().await;
    if let Some(server) = guard.as_ref() {
        return Arc::clone(server);
    }
    let server = Arc::new(spawn_server().await);
    *guard = Some(Arc::clone(&server));
    server
}

async fn fetch_dashboard(base_url: &str) -> DashboardResponse {
    Client::new()
        .get(format!("{base_url}/api/dashboard"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

#[tokio::test]
async fn http_dashboard_invariants_hold() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let dashboard = fetch_dashboard(&server.base_url).await;

    assert_eq!(dashboard.company, "LD CELULOSE");
    assert_eq!(dashboard.total_assets, 1168);
    assert_eq!(
        i64::from(dashboard.total_collected) + dashboard.total_pending,
        i64::from(dashboard.total_assets)
    );
    assert!(!dashboard.percent_complete.is_empty());
    assert!(!dashboard.last_update.is_empty());
}

#[tokio::test]
async fn http_dashboard_chart_shapes() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let dashboard = fetch_dashboard(&server.base_url).await;

    assert_eq!(dashboard.line_chart.labels.len(), 31);
    assert_eq!(dashboard.line_chart.datasets.len(), 4);
    assert!(dashboard
        .line_chart
        .datasets
        .iter()
        .all(|ds| ds.data.len() == 31));

    assert_eq!(dashboard.bar_chart.labels.len(), 2);
    let bars = &dashboard.bar_chart.datasets[0];
    assert_eq!(bars.kind, "bar");
    assert_eq!(bars.data.len(), 2);
    let reference = &dashboard.bar_chart.datasets[1];
    assert_eq!(reference.kind, "line");
    assert_eq!(reference.data, vec![584, 584]);
    assert!(reference.label.contains("584"));
}

#[tokio::test]
async fn http_dashboard_calendar_and_team() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let dashboard = fetch_dashboard(&server.base_url).await;

    assert_eq!(dashboard.calendar.headers.len(), 7);
    assert_eq!(dashboard.calendar.leading_blanks, 5);
    assert_eq!(dashboard.calendar.cells.len(), 31);

    assert_eq!(dashboard.team.len(), 2);
    assert_eq!(dashboard.team[0].name, "Oscar Silva");
    assert!(!dashboard.team[0].share_percent.is_empty());
}

#[tokio::test]
async fn http_index_renders_the_page() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let response = client
        .get(format!("{}/", server.base_url))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());

    let body = response.text().await.unwrap();
    assert!(body.contains("LD CELULOSE"));
    assert!(body.contains("calendarGrid"));
    assert!(body.contains("dashboard-data"));
    assert!(!body.contains("{{"));
}
