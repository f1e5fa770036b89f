use serde::Deserialize;

/// Earliest year a movie can carry (the first film on record).
pub const MIN_YEAR: i32 = 1888;

#[derive(Debug, Deserialize)]
pub struct UserForm {
    pub name: String,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct MovieForm {
    pub title: String,
    #[serde(default)]
    pub director: String,
    #[serde(default)]
    pub year: String,
    #[serde(default)]
    pub rating: String,
}

/// Operator-entered movie fields after boundary validation.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MovieInput {
    pub title: String,
    pub director: Option<String>,
    pub year: Option<i32>,
    pub rating: Option<f64>,
}

/// Validates the manual-entry path of the add/update movie form.
///
/// Blank optional fields are accepted as absent; present but non-numeric or
/// out-of-range values are rejected, never defaulted.
pub fn validate_movie_form(form: &MovieForm, current_year: i32) -> Result<MovieInput, String> {
    let title = form.title.trim();
    if title.is_empty() {
        return Err("Title is required".to_string());
    }

    let director = form.director.trim();
    let director = (!director.is_empty()).then(|| director.to_string());

    let year = match form.year.trim() {
        "" => None,
        raw => {
            let year: i32 = raw
                .parse()
                .map_err(|_| format!("Year must be a whole number, got \"{raw}\""))?;
            if !(MIN_YEAR..=current_year).contains(&year) {
                return Err(format!("Year must be between {MIN_YEAR} and {current_year}"));
            }
            Some(year)
        }
    };

    let rating = match form.rating.trim() {
        "" => None,
        raw => {
            let rating: f64 =
                raw.parse().map_err(|_| format!("Rating must be a number, got \"{raw}\""))?;
            if !(0.0..=10.0).contains(&rating) {
                return Err("Rating must be between 0 and 10".to_string());
            }
            Some(rating)
        }
    };

    Ok(MovieInput { title: title.to_string(), director, year, rating })
}
