//! Event listing and the semicolon-delimited roster export.
//!
//! The export joins evenements, postulations and croupiers client-side with
//! plain linear scans; the store only answers equality queries and the
//! datasets stay at roster scale.

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, HeaderValue},
    Json,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::db::Store;
use crate::error::ApiError;
use crate::models::{Croupier, Evenement, Postulation};
use crate::AppState;

const CSV_HEADER: [&str; 6] = ["NOM", "PRENOM", "MAIL", "DEBUT", "FIN", "PRIORITE"];

pub async fn list_evenements(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Evenement>>, ApiError> {
    let evenements = state.store.list_evenements().await?;
    Ok(Json(evenements))
}

/// Replace the delimiter and line terminators inside a field with a space so
/// a value can never break the row structure.
fn safe(field: &str) -> String {
    field
        .chars()
        .map(|c| if c == '\r' || c == '\n' || c == ';' { ' ' } else { c })
        .collect()
}

fn write_rows(posts: &[Postulation], croupiers: &[Croupier]) -> Result<Vec<u8>, ApiError> {
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(b';')
        .terminator(csv::Terminator::CRLF)
        .quote_style(csv::QuoteStyle::Never)
        .from_writer(Vec::new());

    wtr.write_record(CSV_HEADER)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;

    for post in posts {
        let croupier = croupiers
            .iter()
            .find(|c| c.email.eq_ignore_ascii_case(&post.email));

        let nom = croupier.map(|c| c.nom.as_str()).unwrap_or("");
        let prenom = croupier.map(|c| c.prenom.as_str()).unwrap_or("");
        let priorite = croupier.map(|c| c.priorite.to_string()).unwrap_or_default();

        wtr.write_record([
            safe(nom),
            safe(prenom),
            safe(&post.email),
            safe(&post.debut),
            safe(&post.fin),
            safe(&priorite),
        ])
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;
    }

    let bytes = wtr
        .into_inner()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.error().to_string()))?;

    Ok(bytes)
}

/// Build the export for one event: quoted event name on the first line, fixed
/// header on the second, one row per postulation. Returns the suggested
/// download filename alongside the document.
pub async fn export_event_csv(
    store: &dyn Store,
    event_id: Uuid,
) -> Result<(String, String), ApiError> {
    let evenements = store.list_evenements().await?;
    let ev = evenements
        .into_iter()
        .find(|e| e.id == event_id)
        .ok_or_else(|| ApiError::NotFound("Event not found".to_string()))?;

    let posts: Vec<Postulation> = store
        .list_postulations()
        .await?
        .into_iter()
        .filter(|p| p.event_id == event_id)
        .collect();

    let croupiers = store.list_croupiers().await?;

    let mut csv = format!("\"{}\"\r\n", ev.nom);
    csv.push_str(&String::from_utf8_lossy(&write_rows(&posts, &croupiers)?));

    Ok((format!("{}-dispo.csv", ev.nom), csv))
}

pub async fn export_event(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<(HeaderMap, String), ApiError> {
    let (filename, csv) = export_event_csv(state.store.as_ref(), id).await?;

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/csv; charset=utf-8"),
    );
    let disposition = format!("attachment; filename=\"{}\"", filename.replace('"', ""));
    headers.insert(
        header::CONTENT_DISPOSITION,
        HeaderValue::from_str(&disposition)
            .map_err(|_| ApiError::Validation("event name not usable as a filename".to_string()))?,
    );

    Ok((headers, csv))
}

#[cfg(test)]
mod tests {
    use super::safe;

    #[test]
    fn safe_replaces_delimiter_and_line_breaks() {
        assert_eq!(safe("a;b"), "a b");
        assert_eq!(safe("a\r\nb"), "a  b");
        assert_eq!(safe("plain"), "plain");
    }
}
