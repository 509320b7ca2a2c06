use once_cell::sync::Lazy;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::net::TcpListener;
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;

#[derive(Debug, Deserialize)]
struct Summary {
    total_days: usize,
    total_entries: usize,
}

#[derive(Debug, Deserialize)]
struct Share {
    label: String,
    count: usize,
    percent: f64,
}

#[derive(Debug, Deserialize)]
struct Locations {
    total_visits: usize,
    frequent: Vec<Share>,
    single_visit: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct Point {
    date: String,
    value: f64,
}

#[derive(Debug, Deserialize)]
struct Report {
    summary: Summary,
    meals: Vec<Share>,
    satisfaction_daily: Vec<Point>,
    locations: Locations,
}

#[derive(Debug, Deserialize)]
struct WeekGroup {
    week_start: String,
    week_number: i64,
}

#[derive(Debug, Deserialize)]
struct WeekView {
    view: String,
    groups: Vec<WeekGroup>,
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

static SERVER: Lazy<Mutex<Option<Arc<TestServer>>>> = Lazy::new(|| Mutex::new(None));

const FIXTURE: &str = r#"[
  {"date": "2025-11-11", "exactTime": "12:30", "timeOfDay": "Noon", "category": "food",
   "specificLocation": "Cafe", "satisfaction": 8},
  {"date": "2025-11-10", "exactTime": "08:00", "timeOfDay": "Morning", "category": "Food",
   "specificLocation": "Cafe", "satisfaction": "6"},
  {"date": "2025-11-10", "exactTime": "19:00", "timeOfDay": "Evening", "category": "walk",
   "specificLocation": "Park", "satisfaction": "n/a"},
  {"date": "2025-11-18", "exactTime": "09:15", "timeOfDay": "Morning", "category": "food",
   "specificLocation": "nyc", "nycLocation": "Chelsea", "satisfaction": null}
]"#;

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

fn write_fixture() -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let mut path = std::env::temp_dir();
    path.push(format!("photo_diary_http_{}_{}.json", std::process::id(), nanos));
    std::fs::write(&path, FIXTURE).expect("write fixture");
    path.to_string_lossy().to_string()
}

async fn wait_until_ready(base_url: &str) {
    let client = Client::new();
    let deadline = Instant::now() + Duration::from_secs(3);
    loop {
        if let Ok(resp) = client.get(format!("{base_url}/api/stats")).send().await {
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
    let data_path = write_fixture();
    let child = Command::new(env!("CARGO_BIN_EXE_photo_diary"))
        .env("PORT", port.to_string())
        .env("APP_DATA_PATH", data_path)
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

#[tokio::test]
async fn http_stats_aggregates_fixture() {
    let server = shared_server().await;
    let report: Report = Client::new()
        .get(format!("{}/api/stats", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(report.summary.total_days, 3);
    assert_eq!(report.summary.total_entries, 4);

    let breakfast = &report.meals[0];
    assert_eq!(breakfast.label, "Breakfast");
    assert_eq!(breakfast.count, 2);
    assert_eq!(breakfast.percent, 66.7);

    let dates: Vec<&str> = report
        .satisfaction_daily
        .iter()
        .map(|point| point.date.as_str())
        .collect();
    assert_eq!(dates, ["2025-11-10", "2025-11-11"]);
    assert_eq!(report.satisfaction_daily[0].value, 6.0);

    assert_eq!(report.locations.total_visits, 4);
    assert_eq!(report.locations.frequent[0].label, "Cafe");
    assert_eq!(report.locations.frequent[0].count, 2);
    assert_eq!(report.locations.single_visit, ["Park", "NYC · Chelsea"]);
}

#[tokio::test]
async fn http_calendar_weeks_are_numbered() {
    let server = shared_server().await;
    let client = Client::new();

    let weeks: WeekView = client
        .get(format!("{}/api/calendar?view=weeks", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(weeks.view, "weeks");
    let numbers: Vec<(&str, i64)> = weeks
        .groups
        .iter()
        .map(|week| (week.week_start.as_str(), week.week_number))
        .collect();
    assert_eq!(numbers, [("2025-11-10", 10), ("2025-11-17", 11)]);

    let bad = client
        .get(format!("{}/api/calendar?view=months", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(bad.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn http_unknown_location_group_is_not_found() {
    let server = shared_server().await;
    let client = Client::new();

    let found = client
        .get(format!("{}/api/locations/group", server.base_url))
        .query(&[("label", "Cafe")])
        .send()
        .await
        .unwrap();
    assert!(found.status().is_success());

    let missing = client
        .get(format!("{}/api/locations/group", server.base_url))
        .query(&[("label", "Moon")])
        .send()
        .await
        .unwrap();
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn http_index_renders_dashboard() {
    let server = shared_server().await;
    let html = Client::new()
        .get(format!("{}/", server.base_url))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();

    assert!(html.contains("Mon, Nov 10"));
    assert!(html.contains("Cafe (2)"));
    assert!(html.contains("NYC · Chelsea"));
}
