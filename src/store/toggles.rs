use crate::error::Error;
use crate::models::widget::{WidgetKind, WidgetToggle};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Result};

/// One keyed store serves every sensor widget; there is no per-widget
/// persistence path. Widgets without a stored row read as disabled.
pub fn widget_enabled(conn: &Connection, user_id: &str, widget: WidgetKind) -> Result<bool> {
    let enabled: Option<bool> = conn
        .query_row(
            "SELECT enabled FROM widget_toggles WHERE user_id = ?1 AND widget = ?2",
            params![user_id, widget.as_str()],
            |row| row.get(0),
        )
        .optional()?;

    Ok(enabled.unwrap_or(false))
}

pub fn set_widget_enabled(
    conn: &Connection,
    user_id: &str,
    widget: WidgetKind,
    enabled: bool,
) -> Result<WidgetToggle> {
    let now = Utc::now().timestamp();

    conn.execute(
        "
        INSERT INTO widget_toggles (user_id, widget, enabled, updated_at) VALUES (?1, ?2, ?3, ?4)
        ON CONFLICT(user_id, widget) DO UPDATE SET
            enabled = excluded.enabled,
            updated_at = excluded.updated_at
        ",
        params![user_id, widget.as_str(), enabled, now],
    )?;

    Ok(WidgetToggle {
        user_id: user_id.to_string(),
        widget,
        enabled,
        updated_at: now,
    })
}

/// The full toggle dictionary for one user, defaults filled in for
/// widgets never touched.
pub fn widget_toggles(conn: &Connection, user_id: &str) -> Result<Vec<WidgetToggle>> {
    WidgetKind::ALL
        .into_iter()
        .map(|widget| {
            Ok(WidgetToggle {
                user_id: user_id.to_string(),
                widget,
                enabled: widget_enabled(conn, user_id, widget)?,
                updated_at: 0,
            })
        })
        .collect()
}

/// Boundary validation for widget keys arriving as strings.
pub fn parse_widget_key(key: &str) -> crate::Result<WidgetKind> {
    WidgetKind::parse(key).ok_or_else(|| Error::InvalidInput(format!("unknown widget key: {key}")))
}
