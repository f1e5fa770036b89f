use maud::{DOCTYPE, Markup, html};

use crate::{
    entities::{movie, user},
    models::MovieForm,
};

const TAILWIND_CDN: &str = "https://cdn.tailwindcss.com";

pub fn home_page() -> String {
    page(
        "Filmshelf",
        html! {
            div class="min-h-screen bg-gray-50" {
                div class="max-w-2xl mx-auto px-6 py-12" {
                    div class="bg-white shadow rounded-lg p-8" {
                        h1 class="text-3xl font-bold text-gray-900" { "Filmshelf" }
                        p class="mt-2 text-gray-600" { "Personal movie collections, one shelf per person." }
                        a class="mt-6 inline-block rounded-md bg-blue-600 px-4 py-2 font-semibold text-white hover:bg-blue-700" href="/users" { "Browse users" }
                    }
                }
            }
        },
    )
}

pub fn users_page(users: &[user::Model]) -> String {
    page(
        "Users",
        html! {
            div class="min-h-screen bg-gray-50" {
                div class="max-w-2xl mx-auto px-6 py-12" {
                    div class="flex items-start justify-between gap-6" {
                        h1 class="text-3xl font-bold text-gray-900" { "Users" }
                        a class="rounded-md bg-blue-600 px-4 py-2 font-semibold text-white hover:bg-blue-700" href="/add_user" { "Add user" }
                    }

                    @if users.is_empty() {
                        div class="mt-10 bg-white shadow rounded-lg p-8" {
                            p class="text-gray-600" { "No users yet. Add the first one." }
                        }
                    } @else {
                        div class="mt-10 space-y-4" {
                            @for user in users {
                                div class="bg-white shadow rounded-lg p-6 flex items-center justify-between gap-4" {
                                    a class="text-xl font-semibold text-gray-900 hover:text-blue-700" href=(format!("/users/{}", user.id)) {
                                        (user.name)
                                    }
                                    form method="post" action=(format!("/users/{}/delete", user.id)) {
                                        button class="text-sm text-red-600 hover:text-red-800" type="submit" { "Delete" }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        },
    )
}

pub fn user_movies_page(user: &user::Model, movies: &[movie::Model]) -> String {
    page(
        &format!("{}'s movies", user.name),
        html! {
            div class="min-h-screen bg-gray-50" {
                div class="max-w-4xl mx-auto px-6 py-12" {
                    div class="flex items-start justify-between gap-6" {
                        div {
                            h1 class="text-3xl font-bold text-gray-900" { (user.name) "'s movies" }
                            a class="mt-2 inline-block text-sm text-blue-600 hover:text-blue-800" href="/users" { "All users" }
                        }
                        a class="rounded-md bg-blue-600 px-4 py-2 font-semibold text-white hover:bg-blue-700" href=(format!("/users/{}/add_movie", user.id)) { "Add movie" }
                    }

                    @if movies.is_empty() {
                        div class="mt-10 bg-white shadow rounded-lg p-8" {
                            p class="text-gray-600" { "The shelf is empty." }
                        }
                    } @else {
                        div class="mt-10 space-y-4" {
                            @for movie in movies {
                                (movie_card(user.id, movie))
                            }
                        }
                    }
                }
            }
        },
    )
}

pub fn add_user_page(error: Option<&str>) -> String {
    page(
        "Add user",
        html! {
            div class="min-h-screen bg-gray-50" {
                div class="max-w-2xl mx-auto px-6 py-12" {
                    div class="bg-white shadow rounded-lg p-8" {
                        h1 class="text-2xl font-bold text-gray-900" { "Add user" }

                        @if let Some(message) = error {
                            (error_banner(message))
                        }

                        form class="mt-6 space-y-6" method="post" action="/add_user" {
                            div {
                                label class="block text-sm font-medium text-gray-700" for="name" { "Name" }
                                input class=(INPUT_CLASS) name="name" id="name" required;
                            }
                            button class="w-full rounded-md bg-blue-600 px-4 py-2 font-semibold text-white hover:bg-blue-700" type="submit" { "Add" }
                        }

                        a class="mt-6 inline-block text-sm text-blue-600 hover:text-blue-800" href="/users" { "Back to users" }
                    }
                }
            }
        },
    )
}

pub fn movie_form_page(
    user: &user::Model,
    existing: Option<&movie::Model>,
    form: &MovieForm,
    error: Option<&str>,
) -> String {
    let (title, action) = match existing {
        Some(movie) => {
            ("Edit movie", format!("/users/{}/update_movie/{}", user.id, movie.id))
        }
        None => ("Add movie", format!("/users/{}/add_movie", user.id)),
    };

    page(
        title,
        html! {
            div class="min-h-screen bg-gray-50" {
                div class="max-w-2xl mx-auto px-6 py-12" {
                    div class="bg-white shadow rounded-lg p-8" {
                        h1 class="text-2xl font-bold text-gray-900" { (title) }
                        p class="mt-2 text-gray-600" { "For " (user.name) ". Leave director, year and rating blank to let the metadata lookup fill them in." }

                        @if let Some(message) = error {
                            (error_banner(message))
                        }

                        form class="mt-6 space-y-6" method="post" action=(action) {
                            div {
                                label class="block text-sm font-medium text-gray-700" for="title" { "Title" }
                                input class=(INPUT_CLASS) name="title" id="title" value=(form.title) required;
                            }
                            div {
                                label class="block text-sm font-medium text-gray-700" for="director" { "Director" }
                                input class=(INPUT_CLASS) name="director" id="director" value=(form.director);
                            }
                            div class="grid gap-6 md:grid-cols-2" {
                                div {
                                    label class="block text-sm font-medium text-gray-700" for="year" { "Year" }
                                    input class=(INPUT_CLASS) name="year" id="year" inputmode="numeric" value=(form.year);
                                }
                                div {
                                    label class="block text-sm font-medium text-gray-700" for="rating" { "Rating (0–10)" }
                                    input class=(INPUT_CLASS) name="rating" id="rating" inputmode="decimal" value=(form.rating);
                                }
                            }
                            button class="w-full rounded-md bg-blue-600 px-4 py-2 font-semibold text-white hover:bg-blue-700" type="submit" { "Save" }
                        }

                        a class="mt-6 inline-block text-sm text-blue-600 hover:text-blue-800" href=(format!("/users/{}", user.id)) { "Back to the shelf" }
                    }
                }
            }
        },
    )
}

pub fn error_page(message: String) -> String {
    page(
        "Error",
        html! {
            div class="min-h-screen bg-gray-50 flex items-center justify-center" {
                div class="max-w-xl w-full px-6" {
                    div class="bg-white shadow rounded-lg p-8" {
                        h1 class="text-2xl font-bold text-gray-900" { "Error" }
                        p class="mt-4 text-gray-700" { (message) }
                        a class="mt-6 inline-block text-blue-600 hover:text-blue-800" href="/users" { "Back" }
                    }
                }
            }
        },
    )
}

const INPUT_CLASS: &str = "mt-2 w-full rounded-md border border-gray-300 px-3 py-2 focus:border-blue-500 focus:outline-none focus:ring-1 focus:ring-blue-500";

fn page(title: &str, body: Markup) -> String {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) }
                script src=(TAILWIND_CDN) {}
            }
            body { (body) }
        }
    }
    .into_string()
}

fn movie_card(user_id: i32, movie: &movie::Model) -> Markup {
    html! {
        div class="bg-white shadow rounded-lg p-6" {
            div class="flex items-start gap-6" {
                @if let Some(poster) = &movie.poster_url {
                    img class="h-32 w-auto rounded" src=(poster) alt=(format!("{} poster", movie.title));
                }
                div class="flex-1" {
                    h2 class="text-xl font-semibold text-gray-900" {
                        (movie.title)
                        @if let Some(year) = movie.year {
                            span class="ml-2 font-normal text-gray-500" { "(" (year) ")" }
                        }
                    }
                    @if let Some(director) = &movie.director {
                        p class="mt-1 text-sm text-gray-600" { "Directed by " (director) }
                    }
                    @if let Some(rating) = movie.rating {
                        p class="mt-1 text-sm text-gray-600" { "Rated " (format!("{rating:.1}")) " / 10" }
                    }
                }
                div class="flex flex-col items-end gap-2" {
                    a class="text-sm text-blue-600 hover:text-blue-800" href=(format!("/users/{}/update_movie/{}", user_id, movie.id)) { "Edit" }
                    form method="post" action=(format!("/users/{}/delete_movie/{}", user_id, movie.id)) {
                        button class="text-sm text-red-600 hover:text-red-800" type="submit" { "Delete" }
                    }
                }
            }
        }
    }
}

fn error_banner(message: &str) -> Markup {
    html! {
        div class="mt-6 rounded-md border border-red-200 bg-red-50 p-4" {
            p class="text-sm text-red-700" { (message) }
        }
    }
}
