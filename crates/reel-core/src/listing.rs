//! Listing queries to filter, sort and paginate movies and watchlists.
//!
//! Both operate on in-memory vectors loaded from the store. Sorting is stable,
//! so ties keep the store's order (oldest first).

use std::{cmp::Ordering, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{Error, movie::Movie, watchlist::WatchlistItem};

pub const DEFAULT_PER_PAGE: usize = 18;
pub const MAX_PER_PAGE: usize = 100;

// ─── Year filter ─────────────────────────────────────────────────────────────

/// `YYYY` or an inclusive `YYYY-YYYY` range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YearFilter {
  Exact(i32),
  Range(i32, i32),
}

impl YearFilter {
  pub fn matches(&self, year: Option<i32>) -> bool {
    match (self, year) {
      (_, None) => false,
      (Self::Exact(y), Some(year)) => *y == year,
      (Self::Range(lo, hi), Some(year)) => (*lo..=*hi).contains(&year),
    }
  }
}

impl FromStr for YearFilter {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let bad = || Error::Validation(format!("invalid year filter: {s:?}"));
    let s = s.trim();
    match s.split_once('-') {
      Some((lo, hi)) => {
        let lo: i32 = lo.trim().parse().map_err(|_| bad())?;
        let hi: i32 = hi.trim().parse().map_err(|_| bad())?;
        if lo > hi {
          return Err(bad());
        }
        Ok(Self::Range(lo, hi))
      }
      None => s.parse().map(Self::Exact).map_err(|_| bad()),
    }
  }
}

/// Reject `NaN` and infinities, which would silently disable the filter.
pub fn check_min_rating(min: Option<f64>) -> Result<Option<f64>, Error> {
  match min {
    Some(v) if !v.is_finite() => {
      Err(Error::Validation(format!("min_rating must be a finite number, got {v}")))
    }
    other => Ok(other),
  }
}

// ─── Movie listing ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovieSort {
  /// Most-reviewed first.
  #[default]
  Popularity,
  /// Highest aggregate rating first.
  Rating,
  /// Newest release first.
  ReleaseDate,
  /// Same ordering as `ReleaseDate`.
  Year,
  /// Alphabetical, case-insensitive.
  Title,
}

/// Parameters for listing movies.
#[derive(Debug, Clone, PartialEq)]
pub struct MovieQuery {
  /// Substring match against title or any genre, case-insensitive.
  pub text:       Option<String>,
  /// Exact genre match, case-insensitive.
  pub genre:      Option<String>,
  pub year:       Option<YearFilter>,
  pub min_rating: Option<f64>,
  pub sort:       MovieSort,
  /// 1-based page number.
  pub page:       usize,
  pub per_page:   usize,
}

impl Default for MovieQuery {
  fn default() -> Self {
    Self {
      text:       None,
      genre:      None,
      year:       None,
      min_rating: None,
      sort:       MovieSort::default(),
      page:       1,
      per_page:   DEFAULT_PER_PAGE,
    }
  }
}

/// One page of results plus totals for the whole filtered set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
  pub items:         Vec<T>,
  pub page:          usize,
  pub per_page:      usize,
  pub total_results: usize,
  pub total_pages:   usize,
}

impl MovieQuery {
  pub fn matches(&self, movie: &Movie) -> bool {
    if let Some(text) = self.text.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
      let needle = text.to_lowercase();
      let hit = movie.title.to_lowercase().contains(&needle)
        || movie.genres.iter().any(|g| g.to_lowercase().contains(&needle));
      if !hit {
        return false;
      }
    }
    if let Some(genre) = self.genre.as_deref().filter(|g| !g.is_empty())
      && !movie.has_genre(genre)
    {
      return false;
    }
    if let Some(year) = &self.year
      && !year.matches(movie.release_year)
    {
      return false;
    }
    if let Some(min) = self.min_rating
      && movie.aggregate_rating < min
    {
      return false;
    }
    true
  }

  fn compare(&self, a: &Movie, b: &Movie) -> Ordering {
    match self.sort {
      MovieSort::Popularity => b.rating_count.cmp(&a.rating_count),
      MovieSort::Rating => b.aggregate_rating.total_cmp(&a.aggregate_rating),
      MovieSort::ReleaseDate | MovieSort::Year => {
        // Unknown release years sort last.
        b.release_year.cmp(&a.release_year)
      }
      MovieSort::Title => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
    }
  }

  /// Filter, sort and cut one page out of `movies`.
  pub fn apply(&self, movies: Vec<Movie>) -> Page<Movie> {
    let mut hits: Vec<Movie> =
      movies.into_iter().filter(|m| self.matches(m)).collect();
    hits.sort_by(|a, b| self.compare(a, b));
    paginate(hits, self.page, self.per_page)
  }
}

/// Cut page `page` (1-based; 0 is treated as 1) of `per_page` items, clamped
/// to `1..=MAX_PER_PAGE`.
pub fn paginate<T>(items: Vec<T>, page: usize, per_page: usize) -> Page<T> {
  let page = page.max(1);
  let per_page = per_page.clamp(1, MAX_PER_PAGE);
  let total_results = items.len();
  let total_pages = total_results.div_ceil(per_page);
  let items = items
    .into_iter()
    .skip((page - 1).saturating_mul(per_page))
    .take(per_page)
    .collect();
  Page { items, page, per_page, total_results, total_pages }
}

// ─── Watchlist listing ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WatchlistSort {
  #[default]
  DateAdded,
  Title,
  Year,
  Rating,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
  Asc,
  #[default]
  Desc,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct WatchlistQuery {
  /// Substring match against any genre, case-insensitive.
  pub genre:      Option<String>,
  /// First year of a decade, e.g. `1990` for 1990..=1999.
  pub decade:     Option<i32>,
  pub min_rating: Option<f64>,
  pub watched:    Option<bool>,
  pub sort:       WatchlistSort,
  pub order:      SortOrder,
}

impl WatchlistQuery {
  pub fn matches(&self, item: &WatchlistItem) -> bool {
    let movie = &item.movie;
    if let Some(genre) = self.genre.as_deref().filter(|g| !g.is_empty()) {
      let needle = genre.to_lowercase();
      if !movie.genres.iter().any(|g| g.to_lowercase().contains(&needle)) {
        return false;
      }
    }
    if let Some(decade) = self.decade
      && !YearFilter::Range(decade, decade.saturating_add(9)).matches(movie.release_year)
    {
      return false;
    }
    if let Some(min) = self.min_rating
      && movie.aggregate_rating < min
    {
      return false;
    }
    if let Some(watched) = self.watched
      && item.entry.watched != watched
    {
      return false;
    }
    true
  }

  pub fn apply(&self, items: Vec<WatchlistItem>) -> Vec<WatchlistItem> {
    let mut hits: Vec<WatchlistItem> =
      items.into_iter().filter(|i| self.matches(i)).collect();
    hits.sort_by(|a, b| {
      let ord = match self.sort {
        WatchlistSort::DateAdded => a.entry.added_at.cmp(&b.entry.added_at),
        WatchlistSort::Title => {
          a.movie.title.to_lowercase().cmp(&b.movie.title.to_lowercase())
        }
        WatchlistSort::Year => a.movie.release_year.cmp(&b.movie.release_year),
        WatchlistSort::Rating => {
          a.movie.aggregate_rating.total_cmp(&b.movie.aggregate_rating)
        }
      };
      match self.order {
        SortOrder::Asc => ord,
        SortOrder::Desc => ord.reverse(),
      }
    });
    hits
  }
}

#[cfg(test)]
mod tests {
  use chrono::{Duration, Utc};
  use uuid::Uuid;

  use super::*;
  use crate::watchlist::WatchlistEntry;

  fn movie(title: &str, genres: &[&str], year: Option<i32>, rating: f64, count: u32) -> Movie {
    Movie {
      movie_id:         Uuid::new_v4(),
      title:            title.into(),
      genres:           genres.iter().map(|g| g.to_string()).collect(),
      release_year:     year,
      director:         None,
      cast:             vec![],
      synopsis:         None,
      poster_url:       None,
      aggregate_rating: rating,
      rating_count:     count,
      created_at:       Utc::now(),
    }
  }

  fn catalog() -> Vec<Movie> {
    vec![
      movie("The Dark Knight", &["Action", "Crime", "Drama"], Some(2008), 4.5, 40),
      movie("Inception", &["Action", "Sci-Fi"], Some(2010), 4.4, 55),
      movie("Casablanca", &["Drama", "Romance"], Some(1942), 4.3, 12),
      movie("Pulp Fiction", &["Crime", "Drama"], Some(1994), 4.6, 30),
      movie("Untitled Project", &[], None, 0.0, 0),
    ]
  }

  fn titles(page: &Page<Movie>) -> Vec<&str> {
    page.items.iter().map(|m| m.title.as_str()).collect()
  }

  #[test]
  fn default_sort_is_popularity() {
    let page = MovieQuery::default().apply(catalog());
    assert_eq!(titles(&page)[..2], ["Inception", "The Dark Knight"]);
    assert_eq!(page.total_results, 5);
    assert_eq!(page.total_pages, 1);
  }

  #[test]
  fn text_matches_title_or_genre() {
    let q = MovieQuery { text: Some("sci".into()), ..Default::default() };
    assert_eq!(titles(&q.apply(catalog())), ["Inception"]);

    let q = MovieQuery { text: Some("CASA".into()), ..Default::default() };
    assert_eq!(titles(&q.apply(catalog())), ["Casablanca"]);
  }

  #[test]
  fn genre_year_and_rating_filters_combine() {
    let q = MovieQuery {
      genre: Some("crime".into()),
      year: Some("1990-2009".parse().unwrap()),
      min_rating: Some(4.5),
      sort: MovieSort::Title,
      ..Default::default()
    };
    assert_eq!(titles(&q.apply(catalog())), ["Pulp Fiction", "The Dark Knight"]);
  }

  #[test]
  fn release_sort_puts_unknown_years_last() {
    let q = MovieQuery { sort: MovieSort::ReleaseDate, ..Default::default() };
    let page = q.apply(catalog());
    assert_eq!(titles(&page).first(), Some(&"Inception"));
    assert_eq!(titles(&page).last(), Some(&"Untitled Project"));
  }

  #[test]
  fn pagination_reports_totals() {
    let page = paginate((1..=40).collect::<Vec<_>>(), 3, 18);
    assert_eq!(page.items, (37..=40).collect::<Vec<_>>());
    assert_eq!(page.total_pages, 3);

    let beyond = paginate((1..=40).collect::<Vec<_>>(), 9, 18);
    assert!(beyond.items.is_empty());
    assert_eq!(beyond.total_results, 40);

    let zero = paginate(vec![1, 2, 3], 0, 0);
    assert_eq!(zero.page, 1);
    assert_eq!(zero.per_page, 1);
    assert_eq!(zero.items, [1]);
  }

  #[test]
  fn year_filter_parsing() {
    assert_eq!("1994".parse::<YearFilter>().unwrap(), YearFilter::Exact(1994));
    assert_eq!(
      " 1990 - 1999 ".parse::<YearFilter>().unwrap(),
      YearFilter::Range(1990, 1999)
    );
    assert!("2000-1990".parse::<YearFilter>().is_err());
    assert!("nineties".parse::<YearFilter>().is_err());
  }

  #[test]
  fn watchlist_filters_and_sorts() {
    let now = Utc::now();
    let user_id = Uuid::new_v4();
    let items: Vec<WatchlistItem> = catalog()
      .into_iter()
      .enumerate()
      .map(|(i, movie)| WatchlistItem {
        entry: WatchlistEntry {
          user_id,
          movie_id: movie.movie_id,
          added_at: now + Duration::minutes(i as i64),
          watched: i % 2 == 0,
        },
        movie,
      })
      .collect();

    let newest_first = WatchlistQuery::default().apply(items.clone());
    assert_eq!(newest_first[0].movie.title, "Untitled Project");

    let q = WatchlistQuery {
      genre: Some("dra".into()),
      watched: Some(true),
      sort: WatchlistSort::Rating,
      order: SortOrder::Asc,
      ..Default::default()
    };
    let hits: Vec<_> = q.apply(items.clone()).into_iter().map(|i| i.movie.title).collect();
    assert_eq!(hits, ["Casablanca", "The Dark Knight"]);

    let q = WatchlistQuery { decade: Some(1990), ..Default::default() };
    let hits: Vec<_> = q.apply(items).into_iter().map(|i| i.movie.title).collect();
    assert_eq!(hits, ["Pulp Fiction"]);
  }

  #[test]
  fn extreme_decade_matches_nothing() {
    let movie = movie("Memento", &["Thriller"], Some(2000), 4.2, 8);
    let item = WatchlistItem {
      entry: WatchlistEntry {
        user_id:  Uuid::new_v4(),
        movie_id: movie.movie_id,
        added_at: Utc::now(),
        watched:  false,
      },
      movie,
    };

    let q = WatchlistQuery { decade: Some(i32::MAX), ..Default::default() };
    assert!(q.apply(vec![item.clone()]).is_empty());

    let q = WatchlistQuery { decade: Some(i32::MIN), ..Default::default() };
    assert!(q.apply(vec![item]).is_empty());
  }

  #[test]
  fn non_finite_min_rating_is_rejected() {
    assert_eq!(check_min_rating(None).unwrap(), None);
    assert_eq!(check_min_rating(Some(3.5)).unwrap(), Some(3.5));
    for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
      assert!(matches!(check_min_rating(Some(bad)), Err(Error::Validation(_))));
    }
  }
}
