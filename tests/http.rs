use once_cell::sync::Lazy;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};
use std::net::TcpListener;
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SnapshotResponse {
    todos: usize,
    todos_done: usize,
    todos_remaining: usize,
    todos_pct: u32,
    water: f64,
    water_pct: u32,
    recent_todos: Vec<Value>,
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

fn unique_data_path() -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let mut path = std::env::temp_dir();
    path.push(format!(
        "fitness_dashboard_http_{}_{}.json",
        std::process::id(),
        nanos
    ));
    path.to_string_lossy().to_string()
}

async fn wait_until_ready(base_url: &str) {
    let client = Client::new();
    let deadline = Instant::now() + Duration::from_secs(3);
    loop {
        if let Ok(resp) = client.get(format!("{base_url}/api/snapshot")).send().await {
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
    let data_path = unique_data_path();
    let child = Command::new(env!("CARGO_BIN_EXE_fitness_dashboard"))
        .env("PORT", port.to_string())
        .env("APP_DATA_PATH", data_path)
        .env("APP_RELOAD_SECS", "1")
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

async fn snapshot(client: &Client, base_url: &str) -> SnapshotResponse {
    client
        .get(format!("{base_url}/api/snapshot"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

#[tokio::test]
async fn http_todo_changes_show_in_snapshot() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let before = snapshot(&client, &server.base_url).await;

    let created: Value = client
        .post(format!("{}/api/todos", server.base_url))
        .json(&json!({ "text": "  drink more water " }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(created["text"], "drink more water");
    let id = created["id"].as_i64().expect("todo id");

    let response = client
        .post(format!("{}/api/todos/{id}/toggle", server.base_url))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());

    let after = snapshot(&client, &server.base_url).await;
    assert_eq!(after.todos, before.todos + 1);
    assert_eq!(after.todos_done, before.todos_done + 1);
    assert_eq!(after.todos_remaining + after.todos_done, after.todos);
    assert!(after.todos_pct <= 100);
    assert!(after.recent_todos.len() <= 5);
    assert_eq!(after.recent_todos[0]["id"].as_i64(), Some(id));
}

#[tokio::test]
async fn http_blank_todo_is_rejected() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let response = client
        .post(format!("{}/api/todos", server.base_url))
        .json(&json!({ "text": "   " }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = client
        .post(format!("{}/api/todos/1/toggle", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn http_water_pct_is_clamped() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let response = client
        .put(format!("{}/api/water/goal", server.base_url))
        .json(&json!({ "goal": 2000 }))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
    client
        .post(format!("{}/api/water/reset", server.base_url))
        .send()
        .await
        .unwrap();
    let status: Value = client
        .post(format!("{}/api/water/add", server.base_url))
        .json(&json!({ "amount": 2500 }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(status["pct"], 100);

    let after = snapshot(&client, &server.base_url).await;
    assert_eq!(after.water, 2500.0);
    assert_eq!(after.water_pct, 100);
}

#[tokio::test]
async fn http_chart_splits_categories() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let chart: Value = client
        .post(format!("{}/api/chart", server.base_url))
        .json(&json!({
            "categories": [
                { "label": "a", "value": 3, "color": "A" },
                { "label": "b", "value": 1, "color": "B" }
            ],
            "size": 160
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(chart["kind"], "sectors");
    let sectors = chart["sectors"].as_array().expect("sectors");
    assert_eq!(sectors.len(), 2);
    let sweep = sectors[0]["sweepDeg"].as_f64().unwrap();
    assert!((sweep - 270.0).abs() < 1e-9);

    let ring: Value = client
        .post(format!("{}/api/chart", server.base_url))
        .json(&json!({
            "categories": [
                { "value": 0, "color": "X" },
                { "value": 0, "color": "Y" }
            ]
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(ring["kind"], "ring");
    assert_eq!(ring["ring"]["color"], "X");
}

#[tokio::test]
async fn http_chart_sanitizes_loose_fields() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let response = client
        .post(format!("{}/api/chart", server.base_url))
        .json(&json!({
            "categories": [
                { "label": "a", "value": "1", "color": 5 },
                { "label": "b", "value": 1, "color": "" }
            ],
            "size": "160"
        }))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
    let chart: Value = response.json().await.unwrap();
    assert_eq!(chart["size"], 160.0);
    assert_eq!(chart["sectors"][0]["color"], "#ccc");
    assert_eq!(chart["sectors"][1]["color"], "#ccc");
}

#[tokio::test]
async fn http_home_page_renders() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let response = client.get(&server.base_url).send().await.unwrap();
    assert!(response.status().is_success());
    let body = response.text().await.unwrap();
    assert!(body.contains("To-Do Completion"));
    assert!(body.contains("<svg"));
}
