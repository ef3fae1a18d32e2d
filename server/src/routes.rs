use actix_web::{delete, get, patch, post, put, web, HttpResponse};
use log::{debug, info};
use serde::Deserialize;
use tasklist_shared::{CompletionRequest, CreateTaskRequest, SortKey, UpdateTaskRequest};

use crate::store::{MemoryStore, StoreError};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListQuery {
    sort_by: Option<String>,
}

#[get("/tasks")]
async fn list_tasks(
    store: web::Data<MemoryStore>,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse, StoreError> {
    let sort: SortKey = query
        .sort_by
        .as_deref()
        .and_then(|field| field.parse().ok())
        .unwrap_or_default();
    let tasks = store.list(&sort)?;
    debug!("listing {} tasks sorted by {sort}", tasks.len());
    Ok(HttpResponse::Ok().json(tasks))
}

#[post("/tasks/todo")]
async fn create_task(
    store: web::Data<MemoryStore>,
    body: web::Json<CreateTaskRequest>,
) -> Result<HttpResponse, StoreError> {
    let task = store.create(body.into_inner())?;
    info!("created task {}", task.id);
    Ok(HttpResponse::Created().json(task))
}

#[patch("/tasks/complete/{id}")]
async fn complete_task(
    store: web::Data<MemoryStore>,
    id: web::Path<String>,
    body: web::Json<CompletionRequest>,
) -> Result<HttpResponse, StoreError> {
    if !body.completed {
        debug!("completion flag ignored on complete endpoint for {id}");
    }
    let task = store.set_completed(&id, true)?;
    info!("completed task {}", task.id);
    Ok(HttpResponse::Ok().json(task))
}

#[patch("/tasks/notComplete/{id}")]
async fn uncomplete_task(
    store: web::Data<MemoryStore>,
    id: web::Path<String>,
    body: web::Json<CompletionRequest>,
) -> Result<HttpResponse, StoreError> {
    if body.completed {
        debug!("completion flag ignored on notComplete endpoint for {id}");
    }
    let task = store.set_completed(&id, false)?;
    info!("reopened task {}", task.id);
    Ok(HttpResponse::Ok().json(task))
}

#[put("/tasks/update/{id}")]
async fn update_task(
    store: web::Data<MemoryStore>,
    id: web::Path<String>,
    body: web::Json<UpdateTaskRequest>,
) -> Result<HttpResponse, StoreError> {
    let task = store.update(&id, body.into_inner())?;
    info!("updated task {}", task.id);
    Ok(HttpResponse::Ok().json(task))
}

#[delete("/tasks/delete/{id}")]
async fn delete_task(
    store: web::Data<MemoryStore>,
    id: web::Path<String>,
) -> Result<HttpResponse, StoreError> {
    let task = store.delete(&id)?;
    info!("deleted task {}", task.id);
    Ok(HttpResponse::Ok().json(task))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(list_tasks)
        .service(create_task)
        .service(complete_task)
        .service(uncomplete_task)
        .service(update_task)
        .service(delete_task);
}
