use std::sync::Arc;

use axum::{
    extract::{Form, Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};

use crate::{
    AppState,
    models::{MovieForm, UserForm, validate_movie_form},
    omdb::MovieLookup,
    store::MovieDraft,
    templates,
};

pub async fn home() -> Html<String> {
    Html(templates::home_page())
}

pub async fn list_users(State(state): State<Arc<AppState>>) -> Html<String> {
    let users = state.store.list_users().await;
    Html(templates::users_page(&users))
}

pub async fn user_movies(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i32>,
) -> Response {
    let Some(user) = state.store.get_user(user_id).await else {
        return not_found("User not found");
    };
    let movies = state.store.list_movies_for_user(user_id).await;
    Html(templates::user_movies_page(&user, &movies)).into_response()
}

pub async fn add_user_form() -> Html<String> {
    Html(templates::add_user_page(None))
}

pub async fn add_user(
    State(state): State<Arc<AppState>>,
    Form(form): Form<UserForm>,
) -> Response {
    let name = form.name.trim();
    if name.is_empty() {
        return Html(templates::add_user_page(Some("Name is required"))).into_response();
    }

    match state.store.create_user(name).await {
        Some(_) => Redirect::to("/users").into_response(),
        None => Html(templates::add_user_page(Some("Could not add the user"))).into_response(),
    }
}

pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i32>,
) -> Redirect {
    if !state.store.delete_user(user_id).await {
        tracing::debug!(user_id, "delete_user had nothing to delete");
    }
    Redirect::to("/users")
}

pub async fn add_movie_form(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i32>,
) -> Response {
    let Some(user) = state.store.get_user(user_id).await else {
        return not_found("User not found");
    };
    Html(templates::movie_form_page(&user, None, &MovieForm::default(), None)).into_response()
}

pub async fn add_movie(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i32>,
    Form(form): Form<MovieForm>,
) -> Response {
    let Some(user) = state.store.get_user(user_id).await else {
        return not_found("User not found");
    };

    let draft = match resolve_draft(&state, &form, None).await {
        Ok(draft) => draft,
        Err(reason) => {
            return Html(templates::movie_form_page(&user, None, &form, Some(&reason)))
                .into_response();
        }
    };

    match state.store.create_movie(user_id, draft).await {
        Some(_) => Redirect::to(&format!("/users/{user_id}")).into_response(),
        None => Html(templates::movie_form_page(&user, None, &form, Some("Could not save the movie")))
            .into_response(),
    }
}

pub async fn update_movie_form(
    State(state): State<Arc<AppState>>,
    Path((user_id, movie_id)): Path<(i32, i32)>,
) -> Response {
    let Some(user) = state.store.get_user(user_id).await else {
        return not_found("User not found");
    };
    let Some(movie) = state.store.get_movie(movie_id).await.filter(|m| m.user_id == user_id)
    else {
        return not_found("Movie not found");
    };

    let form = MovieForm {
        title: movie.title.clone(),
        director: movie.director.clone().unwrap_or_default(),
        year: movie.year.map(|y| y.to_string()).unwrap_or_default(),
        rating: movie.rating.map(|r| r.to_string()).unwrap_or_default(),
    };
    Html(templates::movie_form_page(&user, Some(&movie), &form, None)).into_response()
}

pub async fn update_movie(
    State(state): State<Arc<AppState>>,
    Path((user_id, movie_id)): Path<(i32, i32)>,
    Form(form): Form<MovieForm>,
) -> Response {
    let Some(user) = state.store.get_user(user_id).await else {
        return not_found("User not found");
    };
    let Some(movie) = state.store.get_movie(movie_id).await.filter(|m| m.user_id == user_id)
    else {
        return not_found("Movie not found");
    };

    // Only re-run the metadata lookup when the title actually changed;
    // otherwise the stored poster stays as it is.
    let draft = match resolve_draft(&state, &form, Some(&movie.title)).await {
        Ok(draft) => draft,
        Err(reason) => {
            return Html(templates::movie_form_page(&user, Some(&movie), &form, Some(&reason)))
                .into_response();
        }
    };

    match state.store.update_movie(movie_id, draft).await {
        Some(_) => Redirect::to(&format!("/users/{user_id}")).into_response(),
        None => Html(templates::movie_form_page(
            &user,
            Some(&movie),
            &form,
            Some("Could not save the movie"),
        ))
        .into_response(),
    }
}

pub async fn delete_movie(
    State(state): State<Arc<AppState>>,
    Path((user_id, movie_id)): Path<(i32, i32)>,
) -> Redirect {
    if !state.store.delete_movie(movie_id).await {
        tracing::debug!(movie_id, "delete_movie had nothing to delete");
    }
    Redirect::to(&format!("/users/{user_id}"))
}

/// Builds the write payload for an add or update: enrichment first, manual
/// fields with range validation as the fallback. The operator's title wins
/// either way.
async fn resolve_draft(
    state: &AppState,
    form: &MovieForm,
    stored_title: Option<&str>,
) -> Result<MovieDraft, String> {
    let title = form.title.trim().to_string();
    if title.is_empty() {
        return Err("Title is required".to_string());
    }

    let title_unchanged = stored_title.is_some_and(|stored| stored == title);
    if !title_unchanged {
        if let Some(found) = try_lookup(state, &title).await {
            return Ok(MovieDraft {
                title,
                director: found.director,
                year: found.year,
                rating: found.rating,
                poster_url: found.poster_url,
            });
        }
    }

    let today: jiff::civil::Date = jiff::Zoned::now().into();
    let input = validate_movie_form(form, i32::from(today.year()))?;
    Ok(MovieDraft {
        title: input.title,
        director: input.director,
        year: input.year,
        rating: input.rating,
        poster_url: None,
    })
}

async fn try_lookup(state: &AppState, title: &str) -> Option<MovieLookup> {
    match state.omdb.lookup(title).await {
        Ok(found) => {
            if let Some(found) = &found {
                tracing::debug!(title, matched = %found.title, "metadata lookup hit");
            }
            found
        }
        Err(err) => {
            tracing::warn!(%err, title, "metadata lookup failed, falling back to form input");
            None
        }
    }
}

fn not_found(message: &str) -> Response {
    let mut resp = Html(templates::error_page(message.to_string())).into_response();
    *resp.status_mut() = StatusCode::NOT_FOUND;
    resp
}
