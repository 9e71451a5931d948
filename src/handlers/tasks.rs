use axum::extract::{Path, State};
use axum::response::{IntoResponse, Redirect, Response};
use axum::Form;
use axum_extra::extract::CookieJar;
use tracing::{error, info};

use crate::assets::{EDIT_HTML, TODOLIST_HTML};
use crate::db;
use crate::flash;
use crate::middleware::CurrentUser;
use crate::models::{FlashKind, TaskForm};
use crate::render;
use crate::AppState;

pub async fn todolist(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    jar: CookieJar,
) -> Response {
    let tasks = match db::list_tasks(&state.db, user.id) {
        Ok(tasks) => tasks,
        Err(err) => {
            error!(?err, "Failed to load tasks");
            let jar = flash::set(&state.db, jar, FlashKind::Error, "Could not load your tasks");
            return (jar, Redirect::to(&state.path("/"))).into_response();
        }
    };

    info!(user_id = user.id, count = tasks.len(), "Listed tasks");

    let (jar, flash_msg) = flash::take(&state.db, jar);
    let flash_html = render::flash_html(flash_msg.as_ref());
    let name = render::html_escape(&user.name);
    let rows = render::task_rows(&tasks);

    let page = render::page(
        TODOLIST_HTML,
        &[("flash", &flash_html), ("name", &name), ("tasks", &rows)],
        &state.base_path,
    );
    (jar, page).into_response()
}

pub async fn add(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<TaskForm>,
) -> Response {
    let back = state.path("/users/todolist");
    let title = form.title.trim();

    if title.is_empty() {
        let jar = flash::set(&state.db, jar, FlashKind::Error, "Task title cannot be empty");
        return (jar, Redirect::to(&back)).into_response();
    }

    match db::create_task(&state.db, title, user.id) {
        Ok(task) => {
            info!(id = task.id, user_id = user.id, "Created task");
            let jar = flash::set(&state.db, jar, FlashKind::Success, "Task added!");
            (jar, Redirect::to(&back)).into_response()
        }
        Err(err) => {
            error!(?err, "Failed to create task");
            let jar = flash::set(&state.db, jar, FlashKind::Error, "Could not add the task");
            (jar, Redirect::to(&back)).into_response()
        }
    }
}

pub async fn edit_page(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    jar: CookieJar,
) -> Response {
    // A task owned by someone else looks exactly like a missing one.
    match db::get_task(&state.db, id, user.id) {
        Ok(Some(task)) => {
            let (jar, flash_msg) = flash::take(&state.db, jar);
            let flash_html = render::flash_html(flash_msg.as_ref());
            let task_id = task.id.to_string();
            let title = render::html_escape(&task.title);

            let page = render::page(
                EDIT_HTML,
                &[
                    ("flash", &flash_html),
                    ("task_id", &task_id),
                    ("title", &title),
                ],
                &state.base_path,
            );
            (jar, page).into_response()
        }
        Ok(None) => {
            let jar = flash::set(&state.db, jar, FlashKind::Error, "Task not found");
            (jar, Redirect::to(&state.path("/users/todolist"))).into_response()
        }
        Err(err) => {
            error!(?err, "Failed to load task");
            let jar = flash::set(
                &state.db,
                jar,
                FlashKind::Error,
                "Something went wrong, please try again",
            );
            (jar, Redirect::to(&state.path("/users/todolist"))).into_response()
        }
    }
}

pub async fn update(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    jar: CookieJar,
    Form(form): Form<TaskForm>,
) -> Response {
    let back = state.path("/users/todolist");
    let title = form.title.trim();

    if title.is_empty() {
        let jar = flash::set(&state.db, jar, FlashKind::Error, "Task title cannot be empty");
        return (jar, Redirect::to(&back)).into_response();
    }

    let jar = match db::update_task(&state.db, id, user.id, title) {
        Ok(1) => {
            info!(id, user_id = user.id, "Updated task");
            flash::set(&state.db, jar, FlashKind::Success, "Task updated!")
        }
        Ok(_) => flash::set(
            &state.db,
            jar,
            FlashKind::Error,
            "Could not update the task. It may not exist or may not belong to you",
        ),
        Err(err) => {
            error!(?err, "Failed to update task");
            flash::set(&state.db, jar, FlashKind::Error, "Could not update the task")
        }
    };

    (jar, Redirect::to(&back)).into_response()
}

pub async fn delete(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    jar: CookieJar,
) -> Response {
    let back = state.path("/users/todolist");

    let jar = match db::delete_task(&state.db, id, user.id) {
        Ok(1) => {
            info!(id, user_id = user.id, "Deleted task");
            flash::set(&state.db, jar, FlashKind::Success, "Task deleted!")
        }
        Ok(_) => flash::set(
            &state.db,
            jar,
            FlashKind::Error,
            "Could not delete the task. It may not exist or may not belong to you",
        ),
        Err(err) => {
            error!(?err, "Failed to delete task");
            flash::set(&state.db, jar, FlashKind::Error, "Could not delete the task")
        }
    };

    (jar, Redirect::to(&back)).into_response()
}
