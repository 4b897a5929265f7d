use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use heat_dashboard::models::{HeatSample, StatusResponse};
use once_cell::sync::Lazy;
use reqwest::Client;
use std::net::TcpListener;
use std::process::{Child, Command, Stdio};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio::time::sleep;

const REFRESH_MS: u64 = 150;

#[derive(Clone)]
enum Upstream {
    Serve(Vec<HeatSample>),
    ServerError,
    NotJson,
}

#[derive(Clone)]
struct FakeHeat {
    mode: Arc<Mutex<Upstream>>,
    hits: Arc<AtomicUsize>,
}

impl FakeHeat {
    fn set(&self, mode: Upstream) {
        *self.mode.lock().unwrap() = mode;
    }

    fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

async fn fake_heat(State(fake): State<FakeHeat>) -> Response {
    fake.hits.fetch_add(1, Ordering::SeqCst);
    let mode = fake.mode.lock().unwrap().clone();
    match mode {
        Upstream::Serve(samples) => Json(samples).into_response(),
        Upstream::ServerError => (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response(),
        Upstream::NotJson => (StatusCode::OK, "<html>not json</html>").into_response(),
    }
}

async fn spawn_upstream(mode: Upstream) -> (FakeHeat, String) {
    let fake = FakeHeat {
        mode: Arc::new(Mutex::new(mode)),
        hits: Arc::new(AtomicUsize::new(0)),
    };
    let app = Router::new()
        .route("/heat", get(fake_heat))
        .with_state(fake.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}/heat", listener.local_addr().unwrap());
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    (fake, url)
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

#[cfg(unix)]
mod cleanup {
    use once_cell::sync::Lazy;
    use std::sync::{Mutex, Once};

    static REGISTER: Once = Once::new();
    static PIDS: Lazy<Mutex<Vec<i32>>> = Lazy::new(|| Mutex::new(Vec::new()));

    pub fn register(pid: u32) {
        if let Ok(mut pids) = PIDS.lock() {
            pids.push(pid as i32);
        }
        REGISTER.call_once(|| unsafe {
            libc::atexit(on_exit);
        });
    }

    extern "C" fn on_exit() {
        if let Ok(pids) = PIDS.lock() {
            for pid in pids.iter() {
                unsafe {
                    libc::kill(*pid, libc::SIGTERM);
                }
            }
        }
    }
}

static CLIENT: Lazy<Client> = Lazy::new(Client::new);

fn pick_free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind random port");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

async fn wait_until<F, Fut>(what: &str, mut check: F)
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = bool>,
{
    let deadline = Instant::now() + Duration::from_secs(5);
    loop {
        if check().await {
            return;
        }
        if Instant::now() > deadline {
            panic!("timed out waiting for {what}");
        }
        sleep(Duration::from_millis(50)).await;
    }
}

async fn spawn_server(heat_url: &str) -> TestServer {
    let port = pick_free_port();
    let child = Command::new(env!("CARGO_BIN_EXE_heat_dashboard"))
        .env("PORT", port.to_string())
        .env("HEAT_URL", heat_url)
        .env("HEAT_REFRESH_MS", REFRESH_MS.to_string())
        .env("RUST_LOG", "info")
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .expect("failed to spawn server");

    #[cfg(unix)]
    cleanup::register(child.id());

    let base_url = format!("http://127.0.0.1:{port}");
    let status_url = format!("{base_url}/api/status");
    let status_url = status_url.as_str();
    wait_until("server readiness", move || async move {
        matches!(CLIENT.get(status_url).send().await, Ok(resp) if resp.status().is_success())
    })
    .await;

    TestServer { base_url, child }
}

async fn status(server: &TestServer) -> StatusResponse {
    CLIENT
        .get(format!("{}/api/status", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

async fn heat(server: &TestServer) -> Vec<HeatSample> {
    let response = CLIENT
        .get(format!("{}/api/heat", server.base_url))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
    response.json().await.unwrap()
}

async fn wait_for_revision(server: &TestServer, revision: u64) {
    wait_until("revision", move || async move { status(server).await.revision >= revision }).await;
}

fn new_year_sample() -> Vec<HeatSample> {
    vec![HeatSample {
        x: "2024-01-01".into(),
        y: "1".into(),
        d: "2024-01-01".into(),
        v: 25.0,
    }]
}

#[tokio::test(flavor = "multi_thread")]
async fn http_serves_fetched_dataset() {
    let (_fake, url) = spawn_upstream(Upstream::Serve(new_year_sample())).await;
    let server = spawn_server(&url).await;

    wait_for_revision(&server, 1).await;
    assert_eq!(heat(&server).await, new_year_sample());

    let status = status(&server).await;
    assert_eq!(status.sample_count, Some(1));
    assert!(status.refreshed_at.is_some());

    let page = CLIENT
        .get(format!("{}/", server.base_url))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(page.contains("date: 2024-01-01&#10;value: 25.00"));
}

#[tokio::test(flavor = "multi_thread")]
async fn http_failed_fetch_keeps_previous_dataset() {
    let (fake, url) = spawn_upstream(Upstream::Serve(new_year_sample())).await;
    let server = spawn_server(&url).await;
    wait_for_revision(&server, 1).await;

    for mode in [Upstream::ServerError, Upstream::NotJson] {
        fake.set(mode);
        // A fetch already in flight may still succeed; the loop awaits each
        // fetch, so two further hits mean it has been applied.
        let seen = fake.hits();
        let fake = &fake;
        wait_until("in-flight fetch", move || async move { fake.hits() >= seen + 2 }).await;
        let before = status(&server).await;

        let seen = fake.hits();
        wait_until("failed refresh ticks", move || async move { fake.hits() >= seen + 2 }).await;

        assert_eq!(heat(&server).await, new_year_sample());
        let after = status(&server).await;
        assert_eq!(after.revision, before.revision);
        assert_eq!(after.refreshed_at, before.refreshed_at);
        assert_eq!(after.sample_count, Some(1));
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn http_refresh_swaps_dataset() {
    let (fake, url) = spawn_upstream(Upstream::Serve(new_year_sample())).await;
    let server = spawn_server(&url).await;
    wait_for_revision(&server, 1).await;

    let replacement = vec![
        HeatSample {
            x: "2024-01-02".into(),
            y: "2".into(),
            d: "2024-01-02".into(),
            v: 1.5,
        },
        HeatSample {
            x: "2024-01-03".into(),
            y: "3".into(),
            d: "2024-01-03".into(),
            v: 49.0,
        },
    ];
    fake.set(Upstream::Serve(replacement.clone()));

    let (server_ref, expected) = (&server, &replacement);
    wait_until("replacement dataset", move || async move { heat(server_ref).await == *expected }).await;

    let chart: serde_json::Value = CLIENT
        .get(format!("{}/api/chart", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(chart["svg"].as_str().unwrap().contains("value: 49.00"));
}

#[tokio::test(flavor = "multi_thread")]
async fn http_unreachable_upstream_renders_empty_chart() {
    let url = format!("http://127.0.0.1:{}/heat", pick_free_port());
    let server = spawn_server(&url).await;

    sleep(Duration::from_millis(REFRESH_MS * 3)).await;

    let response = CLIENT
        .get(format!("{}/api/heat", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::SERVICE_UNAVAILABLE);

    let status = status(&server).await;
    assert_eq!(status.revision, 0);
    assert_eq!(status.sample_count, None);
    assert!(status.refreshed_at.is_none());

    let page = CLIENT
        .get(format!("{}/", server.base_url))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(page.contains("No data yet"));
}
