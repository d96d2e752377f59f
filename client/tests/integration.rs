//! Full lifecycle tests against the live todo service.
//!
//! # Design
//! Starts the server on a random port, then exercises every client
//! operation over real HTTP using ureq. Validates that the client's request
//! building and response parsing work end-to-end with the actual server —
//! including the schema the two crates define independently.

use todo_client::{
    ApiError, CreateTodo, HttpMethod, HttpResponse, ListQuery, Priority, TodoClient, UpdateTodo,
};

/// Execute an `HttpRequest` using ureq and return an `HttpResponse`.
///
/// Disables ureq's automatic status-code-as-error behavior so 4xx/5xx
/// responses are returned as data rather than `Err`, letting the client
/// handle status interpretation.
fn execute(req: todo_client::HttpRequest) -> HttpResponse {
    let agent = ureq::Agent::config_builder()
        .http_status_as_error(false)
        .build()
        .new_agent();

    let mut response = match (req.method, req.body) {
        (HttpMethod::Get, _) => agent.get(&req.path).call(),
        (HttpMethod::Delete, _) => agent.delete(&req.path).call(),
        (HttpMethod::Patch, Some(body)) => agent
            .patch(&req.path)
            .content_type("application/json")
            .send(body.as_bytes()),
        (HttpMethod::Patch, None) => agent.patch(&req.path).send_empty(),
        (HttpMethod::Post, Some(body)) => agent
            .post(&req.path)
            .content_type("application/json")
            .send(body.as_bytes()),
        (HttpMethod::Post, None) => agent.post(&req.path).send_empty(),
        (HttpMethod::Put, Some(body)) => agent
            .put(&req.path)
            .content_type("application/json")
            .send(body.as_bytes()),
        (HttpMethod::Put, None) => agent.put(&req.path).send_empty(),
    }
    .expect("HTTP transport error");

    let status = response.status().as_u16();
    let body = response.body_mut().read_to_string().unwrap_or_default();

    HttpResponse {
        status,
        headers: Vec::new(),
        body,
    }
}

/// Start the todo service on a random port and return its base URL.
fn start_server() -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            todo_server::run(listener).await
        })
        .unwrap();
    });

    format!("http://{addr}")
}

#[test]
fn crud_lifecycle() {
    let client = TodoClient::new(&start_server());

    // health first — the server is up before anything else runs
    let health = client.parse_health(execute(client.build_health())).unwrap();
    assert_eq!(health.status, "OK");

    // list — empty envelope
    let req = client.build_list_todos(&ListQuery::default()).unwrap();
    let page = client.parse_list_todos(execute(req)).unwrap();
    assert!(page.todos.is_empty());
    assert_eq!(page.pagination.total, 0);

    // create
    let create_input = CreateTodo {
        title: "Integration test".to_string(),
        description: Some("end to end".to_string()),
        priority: Some(Priority::High),
        due_date: None,
    };
    let req = client.build_create_todo(&create_input).unwrap();
    let created = client.parse_create_todo(execute(req)).unwrap();
    assert_eq!(created.title, "Integration test");
    assert_eq!(created.description.as_deref(), Some("end to end"));
    assert_eq!(created.priority, Priority::High);
    assert!(!created.completed);
    let id = created.id;

    // blank title is rejected with the server's message
    let bad_input = CreateTodo {
        title: "   ".to_string(),
        description: None,
        priority: None,
        due_date: None,
    };
    let req = client.build_create_todo(&bad_input).unwrap();
    let err = client.parse_create_todo(execute(req)).unwrap_err();
    match err {
        ApiError::Validation(message) => assert_eq!(message, "Title is required"),
        other => panic!("expected Validation, got {other:?}"),
    }

    // get
    let fetched = client
        .parse_get_todo(execute(client.build_get_todo(id)))
        .unwrap();
    assert_eq!(fetched.id, id);

    // partial update: completed only, title untouched
    let update_input = UpdateTodo {
        completed: Some(true),
        ..Default::default()
    };
    let req = client.build_update_todo(id, &update_input).unwrap();
    let updated = client.parse_update_todo(execute(req)).unwrap();
    assert!(updated.completed);
    assert_eq!(updated.title, "Integration test");

    // toggle flips it back
    let toggled = client
        .parse_toggle_todo(execute(client.build_toggle_todo(id)))
        .unwrap();
    assert!(!toggled.completed);

    // filtered list sees the pending record
    let query = ListQuery {
        completed: Some(false),
        ..Default::default()
    };
    let req = client.build_list_todos(&query).unwrap();
    let page = client.parse_list_todos(execute(req)).unwrap();
    assert_eq!(page.pagination.total, 1);

    // delete returns the record, then the id is gone
    let deleted = client
        .parse_delete_todo(execute(client.build_delete_todo(id)))
        .unwrap();
    assert_eq!(deleted.id, id);

    let err = client
        .parse_get_todo(execute(client.build_get_todo(id)))
        .unwrap_err();
    assert!(matches!(err, ApiError::NotFound));
}

#[test]
fn stats_and_bulk_delete() {
    let client = TodoClient::new(&start_server());

    let titles = [
        ("write report", Priority::High),
        ("file expenses", Priority::Low),
        ("water plants", Priority::Low),
    ];
    let mut ids = Vec::new();
    for (title, priority) in titles {
        let input = CreateTodo {
            title: title.to_string(),
            description: None,
            priority: Some(priority),
            due_date: None,
        };
        let req = client.build_create_todo(&input).unwrap();
        let created = client.parse_create_todo(execute(req)).unwrap();
        ids.push(created.id);
    }

    // complete one record
    client
        .parse_toggle_todo(execute(client.build_toggle_todo(ids[0])))
        .unwrap();

    let stats = client.parse_stats(execute(client.build_stats())).unwrap();
    assert_eq!(stats.total, 3);
    assert_eq!(stats.completed, 1);
    assert_eq!(stats.pending, 2);
    assert_eq!(stats.counts_by_priority.high, 1);
    assert_eq!(stats.counts_by_priority.low, 2);

    // bulk delete removes exactly the completed record
    let deleted = client
        .parse_delete_completed(execute(client.build_delete_completed()))
        .unwrap();
    assert_eq!(deleted.message, "Deleted 1 completed todos");
    assert_eq!(deleted.deleted_todos.len(), 1);
    assert_eq!(deleted.deleted_todos[0].id, ids[0]);

    // a second pass finds nothing completed
    let deleted = client
        .parse_delete_completed(execute(client.build_delete_completed()))
        .unwrap();
    assert!(deleted.deleted_todos.is_empty());

    let stats = client.parse_stats(execute(client.build_stats())).unwrap();
    assert_eq!(stats.total, 2);
    assert_eq!(stats.completed, 0);
}
