//! End-to-end API test: serve the router on an ephemeral port over the
//! in-process store and drive it with an HTTP client.

mod common;

use animal_shelter::app::seed::seed_reference_data;
use animal_shelter::{transport, AnimalRepository, DocumentStore, MemoryDocumentStore};
use common::FailingStore;
use serde_json::{json, Value};
use std::sync::Arc;

struct Server {
    base_url: String,
    client: reqwest::Client,
    handle: tokio::task::JoinHandle<()>,
}

impl Drop for Server {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn start_server() -> Result<Server, Box<dyn std::error::Error>> {
    let store = Arc::new(MemoryDocumentStore::new());
    seed_reference_data(&*store).await?;
    serve(store).await
}

async fn serve(store: Arc<dyn DocumentStore>) -> Result<Server, Box<dyn std::error::Error>> {
    let app_state = transport::http::AppState::new(AnimalRepository::new(store));
    let router = transport::http::create_router(app_state);

    // Bind to an ephemeral port so tests can run in parallel.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let port = listener.local_addr()?.port();
    let handle = tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    Ok(Server {
        base_url: format!("http://127.0.0.1:{}", port),
        client: reqwest::Client::new(),
        handle,
    })
}

impl Server {
    async fn get(&self, path: &str) -> Result<(u16, Value), Box<dyn std::error::Error>> {
        let resp = self.client.get(format!("{}{}", self.base_url, path)).send().await?;
        let status = resp.status().as_u16();
        Ok((status, resp.json().await?))
    }

    async fn send(
        &self,
        method: reqwest::Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<(u16, Value), Box<dyn std::error::Error>> {
        let mut req = self
            .client
            .request(method, format!("{}{}", self.base_url, path));
        if let Some(body) = body {
            req = req.json(&body);
        }
        let resp = req.send().await?;
        let status = resp.status().as_u16();
        Ok((status, resp.json().await?))
    }

    async fn first_id(&self, path: &str) -> Result<String, Box<dyn std::error::Error>> {
        let (_, body) = self.get(path).await?;
        Ok(body["data"][0]["_id"].as_str().unwrap_or_default().to_string())
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_animal_and_checkup_lifecycle() -> Result<(), Box<dyn std::error::Error>> {
    let server = start_server().await?;

    let (status, health) = server.get("/health").await?;
    assert_eq!(status, 200);
    assert_eq!(health["data"]["status"], "ok");

    let (status, types) = server.get("/api/animal-types").await?;
    assert_eq!(status, 200);
    assert_eq!(types["data"].as_array().map(|a| a.len()), Some(4));
    let dog_id = server.first_id("/api/animal-types").await?;
    let vet_id = server.first_id("/api/vets").await?;

    // --- Create ---
    let (status, created) = server
        .send(
            reqwest::Method::POST,
            "/api/animals",
            Some(json!({ "name": "Rexy", "breed": "Labrador", "age": "5", "type_id": dog_id })),
        )
        .await?;
    assert_eq!(status, 201, "{}", created);
    assert!(created["success"].as_bool().unwrap_or(false));
    let animal_id = created["data"]["id"].as_str().unwrap().to_string();

    let (status, list) = server.get("/api/animals").await?;
    assert_eq!(status, 200);
    assert_eq!(list["data"][0]["_id"], animal_id.as_str());
    assert_eq!(list["data"][0]["type"]["name"], "Dog");
    assert_eq!(list["data"][0]["checkups"], json!([]));

    // --- Checkups ---
    let (status, added) = server
        .send(
            reqwest::Method::POST,
            &format!("/api/animals/{}/checkups", animal_id),
            Some(json!({
                "diagnosis": "Hiccups",
                "treatment": "Medication",
                "date": "2020-06-01",
                "vet_id": vet_id
            })),
        )
        .await?;
    assert_eq!(status, 201, "{}", added);
    let checkup_id = added["data"]["id"].as_str().unwrap().to_string();
    assert_eq!(added["data"]["animal_id"], animal_id.as_str());

    let (status, record) = server.get(&format!("/api/checkups/{}", checkup_id)).await?;
    assert_eq!(status, 200);
    assert_eq!(record["data"]["animal_name"], "Rexy");
    assert_eq!(record["data"]["checkup"]["date"], "2020-06-01");
    assert_eq!(record["data"]["checkup"]["vet_name"], "Dr Chua");

    let (status, updated) = server
        .send(
            reqwest::Method::PUT,
            &format!("/api/checkups/{}", checkup_id),
            Some(json!({
                "diagnosis": "Hiccups (resolved)",
                "treatment": "Rest",
                "date": "2020-06-03",
                "vet_id": vet_id
            })),
        )
        .await?;
    assert_eq!(status, 200, "{}", updated);
    assert_eq!(updated["data"]["animal_id"], animal_id.as_str());

    let (status, history) = server
        .get(&format!("/api/animals/{}/checkups", animal_id))
        .await?;
    assert_eq!(status, 200);
    assert_eq!(history["data"]["animal_id"], animal_id.as_str());
    assert_eq!(history["data"]["checkups"][0]["treatment"], "Rest");

    let (status, deleted) = server
        .send(reqwest::Method::DELETE, &format!("/api/checkups/{}", checkup_id), None)
        .await?;
    assert_eq!(status, 200);
    assert_eq!(deleted["data"]["deleted"], true);
    let (status, deleted_again) = server
        .send(reqwest::Method::DELETE, &format!("/api/checkups/{}", checkup_id), None)
        .await?;
    assert_eq!(status, 200);
    assert_eq!(deleted_again["data"]["deleted"], false);

    // --- Update + delete animal ---
    let (status, _) = server
        .send(
            reqwest::Method::PUT,
            &format!("/api/animals/{}", animal_id),
            Some(json!({ "name": "Rexford", "breed": "Labrador", "age": "6", "type_id": dog_id })),
        )
        .await?;
    assert_eq!(status, 200);
    let (_, fetched) = server.get(&format!("/api/animals/{}", animal_id)).await?;
    assert_eq!(fetched["data"]["name"], "Rexford");

    let (status, _) = server
        .send(reqwest::Method::DELETE, &format!("/api/animals/{}", animal_id), None)
        .await?;
    assert_eq!(status, 200);
    let (status, missing) = server.get(&format!("/api/animals/{}", animal_id)).await?;
    assert_eq!(status, 404);
    assert!(!missing["success"].as_bool().unwrap_or(true));

    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_error_status_mapping() -> Result<(), Box<dyn std::error::Error>> {
    let server = start_server().await?;
    let dog_id = server.first_id("/api/animal-types").await?;

    // Validation failure echoes the submitted values.
    let submitted = json!({ "name": "Rex", "breed": "Labrador", "age": "abc", "type_id": dog_id });
    let (status, body) = server
        .send(reqwest::Method::POST, "/api/animals", Some(submitted.clone()))
        .await?;
    assert_eq!(status, 400);
    assert!(body["data"]["errors"]["name_too_short"].is_string());
    assert!(body["data"]["errors"]["age_is_not_a_number"].is_string());
    assert_eq!(body["data"]["previous_values"], submitted);
    let (_, list) = server.get("/api/animals").await?;
    assert_eq!(list["data"], json!([]));

    // Unknown (well-formed) type id.
    let (status, _) = server
        .send(
            reqwest::Method::POST,
            "/api/animals",
            Some(json!({ "name": "Rexy", "breed": "Labrador", "age": "5", "type_id": "5f34ec63319879464b4759df" })),
        )
        .await?;
    assert_eq!(status, 404);

    // Malformed body id.
    let (status, _) = server
        .send(
            reqwest::Method::POST,
            "/api/animals",
            Some(json!({ "name": "Rexy", "breed": "Labrador", "age": "5", "type_id": "dog" })),
        )
        .await?;
    assert_eq!(status, 422);

    // A malformed type id does not hide field errors.
    let submitted = json!({ "name": "Rex", "breed": "Labrador", "age": "abc", "type_id": "" });
    let (status, body) = server
        .send(reqwest::Method::POST, "/api/animals", Some(submitted.clone()))
        .await?;
    assert_eq!(status, 400, "{}", body);
    assert!(body["data"]["errors"]["name_too_short"].is_string());
    assert!(body["data"]["errors"]["age_is_not_a_number"].is_string());
    assert_eq!(body["data"]["previous_values"], submitted);

    let (status, body) = server
        .send(
            reqwest::Method::PUT,
            &format!("/api/animals/{}", "5f34ec63319879464b4759df"),
            Some(json!({ "name": "Rexy", "breed": "Lab", "age": "5", "type_id": "dog" })),
        )
        .await?;
    assert_eq!(status, 400, "{}", body);
    assert!(body["data"]["errors"]["breed_too_short"].is_string());

    // Missing fields.
    let (status, _) = server
        .send(reqwest::Method::POST, "/api/animals", Some(json!({ "name": "Rexy" })))
        .await?;
    assert_eq!(status, 422);

    // Malformed path ids cannot name any document.
    let (status, _) = server.get("/api/animals/not-an-id").await?;
    assert_eq!(status, 404);
    let (status, _) = server.get("/api/checkups/5f34ec63319879464b4759df").await?;
    assert_eq!(status, 404);

    // Bad checkup date.
    let (_, created) = server
        .send(
            reqwest::Method::POST,
            "/api/animals",
            Some(json!({ "name": "Rexy", "breed": "Labrador", "age": "5", "type_id": dog_id })),
        )
        .await?;
    let animal_id = created["data"]["id"].as_str().unwrap_or_default().to_string();
    let vet_id = server.first_id("/api/vets").await?;
    let (status, _) = server
        .send(
            reqwest::Method::POST,
            &format!("/api/animals/{}/checkups", animal_id),
            Some(json!({ "diagnosis": "Hiccups", "treatment": "Rest", "date": "01/06/2020", "vet_id": vet_id })),
        )
        .await?;
    assert_eq!(status, 422);

    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_store_failure_status_mapping() -> Result<(), Box<dyn std::error::Error>> {
    let server = serve(Arc::new(FailingStore)).await?;

    let (status, health) = server.get("/health").await?;
    assert_eq!(status, 503);
    assert_eq!(health["data"]["status"], "unhealthy");

    let (status, body) = server.get("/api/animals").await?;
    assert_eq!(status, 500);
    assert!(!body["success"].as_bool().unwrap_or(true));

    let (status, _) = server
        .send(
            reqwest::Method::POST,
            "/api/animals",
            Some(json!({ "name": "Rexy", "breed": "Labrador", "age": "5", "type_id": "5f34ec63319879464b4759df" })),
        )
        .await?;
    assert_eq!(status, 500);

    let (status, _) = server
        .send(reqwest::Method::DELETE, "/api/checkups/5f34ec63319879464b4759df", None)
        .await?;
    assert_eq!(status, 500);

    Ok(())
}
