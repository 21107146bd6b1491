//! Server-rendered HTML report
//!
//! One self-contained page: KPI strip, top-5 table, stacked breakdown of
//! weighted contributions and a detail card for one engineer. The controls
//! are a plain GET form, so every slider change re-renders with new weights.

use common::models::{EngineerScoreRow, SnapshotSummary, Weights};
use processor::scoring::{find_engineer, top_engineers};

use crate::routes::params::TOP_CHOICES;

/// Rows in the leaderboard table
const TABLE_SIZE: usize = 5;

/// What the page was asked to show
pub struct PageView<'a> {
    /// Slider positions as submitted, before normalization
    pub weights: Weights,
    pub top: usize,
    pub engineer: Option<&'a str>,
}

/// Render the report page for rows already ranked under `view.weights`
pub fn render(summary: &SnapshotSummary, rows: &[EngineerScoreRow], view: &PageView) -> String {
    let mut html = String::new();

    html.push_str(&render_head(summary));
    html.push_str("<body>\n<div class=\"container\">\n");
    html.push_str(&render_header(summary));
    html.push_str(&render_controls(rows, view));
    html.push_str(&render_kpis(summary));

    if rows.is_empty() {
        html.push_str("<p class=\"empty\">No data found in this window.</p>\n");
    } else {
        html.push_str(&render_table(top_engineers(rows, TABLE_SIZE)));
        html.push_str(&render_breakdown(top_engineers(rows, view.top)));

        let selected = view
            .engineer
            .and_then(|login| find_engineer(rows, login))
            .unwrap_or(&rows[0]);
        html.push_str(&render_detail(selected, rows.len()));
    }

    html.push_str("</div>\n</body>\n</html>");
    html
}

fn render_head(summary: &SnapshotSummary) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Engineer impact - {}/{}</title>
    <style>
{CSS}
    </style>
</head>
"#,
        html_escape(&summary.owner),
        html_escape(&summary.repo)
    )
}

fn render_header(summary: &SnapshotSummary) -> String {
    format!(
        r#"<div class="header">
    <h1>Engineer impact: {}/{}</h1>
    <p class="caption">Based on {} merged PRs since {} (fetched {})</p>
</div>
"#,
        html_escape(&summary.owner),
        html_escape(&summary.repo),
        summary.prs_analyzed,
        summary.merged_after.format("%Y-%m-%d"),
        summary.fetched_at.format("%Y-%m-%d %H:%M UTC")
    )
}

fn render_controls(rows: &[EngineerScoreRow], view: &PageView) -> String {
    let mut html = String::new();
    html.push_str("<form class=\"controls\" method=\"get\" action=\"/\">\n");

    for (name, label, value) in [
        ("shipping", "Shipping", view.weights.shipping),
        ("collaboration", "Collaboration", view.weights.collaboration),
        ("speed", "Speed", view.weights.speed),
    ] {
        html.push_str(&format!(
            r#"    <label>{label} <output>{value:.2}</output>
        <input type="range" name="{name}" min="0" max="1" step="0.05" value="{value:.2}" onchange="this.form.submit()">
    </label>
"#
        ));
    }

    html.push_str("    <label>Breakdown size <select name=\"top\" onchange=\"this.form.submit()\">\n");
    for choice in TOP_CHOICES {
        let selected = if choice == view.top { " selected" } else { "" };
        html.push_str(&format!(
            "        <option value=\"{choice}\"{selected}>Top {choice}</option>\n"
        ));
    }
    html.push_str("    </select></label>\n");

    if !rows.is_empty() {
        html.push_str(
            "    <label>Engineer <select name=\"engineer\" onchange=\"this.form.submit()\">\n",
        );
        for row in rows {
            let selected = if view.engineer == Some(row.engineer_login.as_str()) {
                " selected"
            } else {
                ""
            };
            let login = html_escape(&row.engineer_login);
            html.push_str(&format!(
                "        <option value=\"{login}\"{selected}>#{} {login}</option>\n",
                row.rank
            ));
        }
        html.push_str("    </select></label>\n");
    }

    let normalized = view.weights.normalized();
    html.push_str(&format!(
        "    <p class=\"weights-note\">Effective weights: shipping {:.2}, collaboration {:.2}, speed {:.2}</p>\n",
        normalized.shipping, normalized.collaboration, normalized.speed
    ));
    html.push_str("    <noscript><button type=\"submit\">Apply</button></noscript>\n</form>\n");
    html
}

fn render_kpis(summary: &SnapshotSummary) -> String {
    format!(
        r#"<div class="metrics-grid">
    <div class="metric-card"><h3>PRs analyzed</h3><div class="metric-value">{}</div></div>
    <div class="metric-card"><h3>Unique authors</h3><div class="metric-value">{}</div></div>
    <div class="metric-card"><h3>Unique reviewers</h3><div class="metric-value">{}</div></div>
</div>
"#,
        summary.prs_analyzed, summary.unique_authors, summary.unique_reviewers
    )
}

fn render_table(rows: &[EngineerScoreRow]) -> String {
    let mut html = String::from(
        r#"<div class="section">
    <h2 class="section-title">Top engineers</h2>
    <table>
        <thead><tr><th>Rank</th><th>Engineer</th><th>Impact</th><th>Shipping</th><th>Collaboration</th><th>Speed</th><th>Merged PRs</th><th>Reviews</th></tr></thead>
        <tbody>
"#,
    );

    for row in rows {
        html.push_str(&format!(
            "            <tr><td>{}</td><td>{}</td><td>{:.3}</td><td>{:.3}</td><td>{:.3}</td><td>{:.3}</td><td>{}</td><td>{}</td></tr>\n",
            row.rank,
            html_escape(&row.engineer_login),
            row.impact_score,
            row.shipping_score,
            row.collaboration_score,
            row.speed_score,
            row.aggregates.merged_pr_count,
            row.aggregates.reviews_authored
        ));
    }

    html.push_str("        </tbody>\n    </table>\n</div>\n");
    html
}

/// One bar segment, as percentages of the chart width
#[derive(Debug, Clone, Copy, PartialEq)]
struct Segment {
    left: f64,
    width: f64,
}

/// Lay out a diverging stacked bar around a center axis at 50%.
///
/// Positive parts stack rightwards and negative parts leftwards. `scale` is
/// the largest one-sided stack on the chart and maps to half the width.
fn layout_bar(parts: [f64; 3], scale: f64) -> [Segment; 3] {
    let mut pos = 0.0;
    let mut neg = 0.0;
    parts.map(|value| {
        if scale <= 0.0 {
            return Segment {
                left: 50.0,
                width: 0.0,
            };
        }
        let width = value.abs() / scale * 50.0;
        if value >= 0.0 {
            let left = 50.0 + pos;
            pos += width;
            Segment { left, width }
        } else {
            neg += width;
            Segment {
                left: 50.0 - neg,
                width,
            }
        }
    })
}

fn weighted_parts(row: &EngineerScoreRow) -> [f64; 3] {
    [
        row.weighted.w_shipping,
        row.weighted.w_collaboration,
        row.weighted.w_speed,
    ]
}

fn chart_scale(rows: &[EngineerScoreRow]) -> f64 {
    rows.iter()
        .map(|row| {
            let parts = weighted_parts(row);
            let pos: f64 = parts.iter().filter(|v| **v > 0.0).sum();
            let neg: f64 = parts.iter().filter(|v| **v < 0.0).map(|v| -v).sum();
            pos.max(neg)
        })
        .fold(0.0, f64::max)
}

fn render_breakdown(rows: &[EngineerScoreRow]) -> String {
    let scale = chart_scale(rows);
    let mut html = format!(
        r#"<div class="section">
    <h2 class="section-title">Weighted breakdown, top {}</h2>
    <div class="legend"><span class="seg-shipping">shipping</span> <span class="seg-collaboration">collaboration</span> <span class="seg-speed">speed</span> <span class="marker-key">| impact</span></div>
"#,
        rows.len()
    );

    for row in rows {
        let segments = layout_bar(weighted_parts(row), scale);
        let marker = if scale > 0.0 {
            50.0 + row.impact_score / scale * 50.0
        } else {
            50.0
        };

        html.push_str(&format!(
            "    <div class=\"bar-row\"><span class=\"bar-label\">{}</span><div class=\"bar\">\n",
            html_escape(&row.engineer_login)
        ));
        for (class, segment) in ["seg-shipping", "seg-collaboration", "seg-speed"]
            .iter()
            .zip(segments)
        {
            html.push_str(&format!(
                "        <div class=\"seg {}\" style=\"left: {:.2}%; width: {:.2}%\"></div>\n",
                class, segment.left, segment.width
            ));
        }
        html.push_str(&format!(
            "        <div class=\"marker\" style=\"left: {:.2}%\" title=\"impact {:.3}\"></div>\n    </div><span class=\"bar-value\">{:.3}</span></div>\n",
            marker, row.impact_score, row.impact_score
        ));
    }

    html.push_str("</div>\n");
    html
}

fn render_detail(row: &EngineerScoreRow, total: usize) -> String {
    let agg = &row.aggregates;
    format!(
        r#"<div class="section detail">
    <h2 class="section-title">{login}</h2>
    <p class="rank">Rank #{rank} out of {total} engineers</p>
    <div class="metrics-grid">
        <div class="metric-card"><h3>Impact</h3><div class="metric-value">{impact:.2}</div></div>
        <div class="metric-card"><h3>Shipping</h3><div class="metric-value">{shipping:.2}</div></div>
        <div class="metric-card"><h3>Collaboration</h3><div class="metric-value">{collab:.2}</div></div>
        <div class="metric-card"><h3>Speed</h3><div class="metric-value">{speed:.2}</div></div>
    </div>
    <h3>Weighted contributions</h3>
    <ul>
        <li>Shipping: {w_shipping:.2}</li>
        <li>Collaboration: {w_collab:.2}</li>
        <li>Speed: {w_speed:.2}</li>
    </ul>
    <h3>Raw metrics</h3>
    <ul>
        <li>Merged PRs: {merged}</li>
        <li>Average PR size (log lines changed): {size:.2}</li>
        <li>Average changed files: {files:.2}</li>
        <li>Median cycle time: {cycle:.2} days</li>
        <li>Reviews written: {reviews}</li>
        <li>Merged PRs reviewed: {reviewed}</li>
    </ul>
</div>
"#,
        login = html_escape(&row.engineer_login),
        rank = row.rank,
        total = total,
        impact = row.impact_score,
        shipping = row.shipping_score,
        collab = row.collaboration_score,
        speed = row.speed_score,
        w_shipping = row.weighted.w_shipping,
        w_collab = row.weighted.w_collaboration,
        w_speed = row.weighted.w_speed,
        merged = agg.merged_pr_count,
        size = agg.avg_pr_size_log,
        files = agg.avg_changed_files,
        cycle = agg.median_cycle_time_hours / 24.0,
        reviews = agg.reviews_authored,
        reviewed = agg.prs_reviewed_that_merged,
    )
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

const CSS: &str = r#"
:root {
    --primary-color: #1d4aff;
    --background-color: #f8fafc;
    --text-color: #1e293b;
    --card-background: white;
    --border-color: #e2e8f0;
}
body { font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, sans-serif; background: var(--background-color); color: var(--text-color); margin: 0; }
.container { max-width: 1100px; margin: 0 auto; padding: 24px; }
.header h1 { margin-bottom: 4px; }
.caption { color: #64748b; margin-top: 0; }
.controls { display: flex; flex-wrap: wrap; gap: 16px; align-items: center; background: var(--card-background); border: 1px solid var(--border-color); border-radius: 8px; padding: 12px 16px; }
.controls label { display: flex; flex-direction: column; font-size: 0.9em; }
.weights-note { flex-basis: 100%; margin: 0; color: #64748b; font-size: 0.85em; }
.metrics-grid { display: grid; grid-template-columns: repeat(auto-fit, minmax(160px, 1fr)); gap: 12px; margin: 16px 0; }
.metric-card { background: var(--card-background); border: 1px solid var(--border-color); border-radius: 8px; padding: 12px 16px; }
.metric-card h3 { margin: 0 0 6px; font-size: 0.85em; color: #64748b; font-weight: 500; }
.metric-value { font-size: 1.6em; font-weight: 600; }
.section { background: var(--card-background); border: 1px solid var(--border-color); border-radius: 8px; padding: 16px; margin: 16px 0; }
.section-title { margin-top: 0; }
table { width: 100%; border-collapse: collapse; }
th, td { text-align: left; padding: 6px 8px; border-bottom: 1px solid var(--border-color); }
.bar-row { display: flex; align-items: center; gap: 8px; margin: 4px 0; }
.bar-label { width: 140px; overflow: hidden; text-overflow: ellipsis; white-space: nowrap; }
.bar-value { width: 60px; text-align: right; font-variant-numeric: tabular-nums; }
.bar { position: relative; flex: 1; height: 18px; background: #f1f5f9; border-left: 1px solid transparent; }
.bar::after { content: ""; position: absolute; left: 50%; top: 0; bottom: 0; border-left: 1px dashed #94a3b8; }
.seg { position: absolute; top: 2px; bottom: 2px; }
.seg-shipping { background: #1d4aff; color: #1d4aff; }
.seg-collaboration { background: #f59e0b; color: #f59e0b; }
.seg-speed { background: #10b981; color: #10b981; }
.legend span { font-size: 0.85em; margin-right: 8px; }
.legend .seg-shipping, .legend .seg-collaboration, .legend .seg-speed { background: none; }
.marker { position: absolute; top: -2px; bottom: -2px; width: 2px; background: #0f172a; }
.empty { padding: 24px; text-align: center; color: #64748b; }
.rank { color: #64748b; }
"#;
