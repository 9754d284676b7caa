//! Embedded HTML pages.
//!
//! Templates are plain strings with `{{PLACEHOLDER}}` markers. Everything
//! interpolated goes through [`escape_html`].

use crate::cricket::{Team, Venue};
use crate::error::AppError;
use crate::predict::MatchPrediction;

pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(title: &str, body: &str) -> String {
    LAYOUT_HTML
        .replace("{{TITLE}}", &escape_html(title))
        .replace("{{BODY}}", body)
}

fn team_options() -> String {
    Team::ALL
        .iter()
        .map(|t| {
            let name = escape_html(t.name());
            format!(r#"<option value="{name}">{name}</option>"#)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn venue_options() -> String {
    Venue::all()
        .iter()
        .map(|v| {
            let name = escape_html(v.name());
            format!(r#"<option value="{name}">{name}</option>"#)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn home_page() -> String {
    layout("Cricket Oracle", HOME_HTML)
}

pub fn match_form_page() -> String {
    let body = MATCH_FORM_HTML
        .replace("{{TEAM_OPTIONS}}", &team_options())
        .replace("{{VENUE_OPTIONS}}", &venue_options());
    layout("Match Prediction", &body)
}

pub fn result_page(p: &MatchPrediction) -> String {
    let body = RESULT_HTML
        .replace("{{BATTING_TEAM}}", &escape_html(p.batting_team.name()))
        .replace("{{BOWLING_TEAM}}", &escape_html(p.bowling_team.name()))
        .replace("{{BATTING_PCT}}", &p.batting_win_pct.to_string())
        .replace("{{BOWLING_PCT}}", &p.bowling_win_pct.to_string())
        .replace("{{RUNS_LEFT}}", &p.features.runs_left.to_string())
        .replace("{{BALLS_LEFT}}", &p.features.balls_left.to_string())
        .replace("{{WICKETS_LEFT}}", &p.features.wickets_left.to_string())
        .replace("{{CRR}}", &format!("{:.2}", p.features.current_run_rate))
        .replace("{{RRR}}", &format!("{:.2}", p.features.required_run_rate));
    layout("Match Prediction Result", &body)
}

pub fn score_page(prediction: Option<i64>) -> String {
    let result = match prediction {
        Some(total) => format!(
            r#"<div class="result" id="result">Predicted final score: <strong>{}</strong></div>"#,
            total
        ),
        None => r#"<div class="result" id="result" hidden></div>"#.to_string(),
    };
    let body = SCORE_FORM_HTML
        .replace("{{TEAM_OPTIONS}}", &team_options())
        .replace("{{VENUE_OPTIONS}}", &venue_options())
        .replace("{{RESULT}}", &result);
    layout("Score Prediction", &body)
}

pub fn batting_stats_page() -> String {
    let body = STATS_HTML
        .replace("{{HEADING}}", "Batting Statistics")
        .replace("{{ENDPOINT}}", "/api/player_stats")
        .replace(
            "{{COLUMNS}}",
            r#"["player","total_runs","avg_runs","avg_strikerate","total_4s","total_6s","innings_count"]"#,
        )
        .replace("{{TEAM_OPTIONS}}", &team_options());
    layout("Batting Statistics", &body)
}

pub fn bowling_stats_page() -> String {
    let body = STATS_HTML
        .replace("{{HEADING}}", "Bowling Statistics")
        .replace("{{ENDPOINT}}", "/api/bowl_stats")
        .replace(
            "{{COLUMNS}}",
            r#"["player","total_wicket","total_runs1","avg_runrate","total_overs","total_maiden","matches"]"#,
        )
        .replace("{{TEAM_OPTIONS}}", &team_options());
    layout("Bowling Statistics", &body)
}

pub fn error_page(err: &AppError) -> String {
    let body = ERROR_HTML
        .replace("{{KIND}}", err.kind())
        .replace("{{MESSAGE}}", &escape_html(&err.to_string()));
    layout("Error", &body)
}

const LAYOUT_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>{{TITLE}}</title>
<style>
  :root { --bg: #0f1117; --card: #1a1d27; --border: #2a2d3a; --accent: #1fa35c; --red: #ff4f6a; --text: #e0e0e0; --muted: #8888aa; }
  * { box-sizing: border-box; margin: 0; padding: 0; }
  body { background: var(--bg); color: var(--text); font-family: 'Segoe UI', system-ui, sans-serif; }
  header { display: flex; gap: 1.5rem; align-items: center; padding: 1rem 2rem; border-bottom: 1px solid var(--border); }
  header a { color: var(--muted); text-decoration: none; font-size: .9rem; }
  header a:hover { color: var(--accent); }
  header h1 { font-size: 1.3rem; margin-right: auto; }
  main { padding: 1.5rem 2rem; max-width: 960px; margin: 0 auto; display: grid; gap: 1.5rem; }
  .panel { background: var(--card); border: 1px solid var(--border); border-radius: 10px; padding: 1.2rem; }
  form { display: grid; grid-template-columns: 1fr 1fr; gap: 1rem; }
  label { display: grid; gap: .3rem; font-size: .8rem; color: var(--muted); text-transform: uppercase; }
  input, select { background: var(--bg); color: var(--text); border: 1px solid var(--border); border-radius: 6px; padding: .5rem; }
  button { grid-column: 1 / -1; background: var(--accent); color: #000; border: none; border-radius: 6px; padding: .7rem; font-weight: 700; cursor: pointer; }
  .result { font-size: 1.4rem; }
  .bars { display: grid; gap: .6rem; }
  .bar { background: var(--accent); padding: .5rem; border-radius: 6px; color: #000; font-weight: 700; }
  .bar.other { background: var(--red); }
  table { width: 100%; border-collapse: collapse; }
  th { padding: .6rem; text-align: left; font-size: .75rem; text-transform: uppercase; color: var(--muted); border-bottom: 1px solid var(--border); }
  td { padding: .55rem .6rem; font-size: .88rem; border-bottom: 1px solid #1e2130; }
  .error { color: var(--red); }
</style>
</head>
<body>
<header>
  <h1>🏏 Cricket Oracle</h1>
  <a href="/match_prediction">Match prediction</a>
  <a href="/score_prediction">Score prediction</a>
  <a href="/stats">Batting</a>
  <a href="/bowl">Bowling</a>
</header>
<main>
{{BODY}}
</main>
</body>
</html>"#;

const HOME_HTML: &str = r#"<div class="panel">
  <h2>ODI match predictor</h2>
  <p>Chase win probabilities, projected first-innings totals and tournament player statistics.</p>
</div>
<div class="panel"><a href="/match_prediction">Who wins the chase? →</a></div>
<div class="panel"><a href="/score_prediction">Project the final total →</a></div>
<div class="panel"><a href="/stats">Batting leaders →</a> · <a href="/bowl">Bowling leaders →</a></div>"#;

const MATCH_FORM_HTML: &str = r#"<div class="panel">
  <h2>Match prediction</h2>
  <form method="post" action="/predict">
    <label>Batting team<select name="batting_team">{{TEAM_OPTIONS}}</select></label>
    <label>Bowling team<select name="bowling_team">{{TEAM_OPTIONS}}</select></label>
    <label>Venue<select name="venue">{{VENUE_OPTIONS}}</select></label>
    <label>Target<input type="number" name="score" min="0" required></label>
    <label>Current score<input type="number" name="current_score" min="0" required></label>
    <label>Overs completed<input type="number" name="overs" min="0" max="50" step="0.1" required></label>
    <label>Wickets lost<input type="number" name="wickets" min="0" max="10" required></label>
    <button type="submit">Predict</button>
  </form>
</div>"#;

const RESULT_HTML: &str = r#"<div class="panel">
  <h2>Win probability</h2>
  <div class="bars">
    <div class="bar" style="width: max({{BATTING_PCT}}%, 8em)">{{BATTING_TEAM}}: {{BATTING_PCT}}%</div>
    <div class="bar other" style="width: max({{BOWLING_PCT}}%, 8em)">{{BOWLING_TEAM}}: {{BOWLING_PCT}}%</div>
  </div>
</div>
<div class="panel">
  <table>
    <tr><th>Runs left</th><th>Balls left</th><th>Wickets left</th><th>CRR</th><th>RRR</th></tr>
    <tr><td>{{RUNS_LEFT}}</td><td>{{BALLS_LEFT}}</td><td>{{WICKETS_LEFT}}</td><td>{{CRR}}</td><td>{{RRR}}</td></tr>
  </table>
</div>
<div class="panel"><a href="/match_prediction">← Another prediction</a></div>"#;

const SCORE_FORM_HTML: &str = r#"<div class="panel">
  <h2>Score prediction</h2>
  <form method="post" action="/score_prediction" id="score-form">
    <label>Batting team<select name="batting_team">{{TEAM_OPTIONS}}</select></label>
    <label>Bowling team<select name="bowling_team">{{TEAM_OPTIONS}}</select></label>
    <label>City<select name="city">{{VENUE_OPTIONS}}</select></label>
    <label>Current score<input type="number" name="current_score" min="0" required></label>
    <label>Overs completed<input type="number" name="overs" min="0" max="50" step="0.1" required></label>
    <label>Wickets lost<input type="number" name="wickets" min="0" max="10" required></label>
    <label>Runs in last 5 overs<input type="number" name="last_five" min="0" required></label>
    <label>Wickets in last 5 overs<input type="number" name="wickets_last_five" min="0" max="10" required></label>
    <button type="submit">Predict</button>
  </form>
</div>
<div class="panel">{{RESULT}}</div>
<script>
document.getElementById('score-form').addEventListener('submit', async (ev) => {
  ev.preventDefault();
  const out = document.getElementById('result');
  const r = await fetch('/score_prediction', {
    method: 'POST',
    headers: { 'X-Requested-With': 'XMLHttpRequest' },
    body: new URLSearchParams(new FormData(ev.target)),
  });
  const data = await r.json();
  out.hidden = false;
  if (r.ok) {
    out.className = 'result';
    out.textContent = 'Predicted final score: ' + data.prediction;
  } else {
    out.className = 'result error';
    out.textContent = data.message || data.error;
  }
});
</script>"#;

const STATS_HTML: &str = r#"<div class="panel">
  <h2>{{HEADING}}</h2>
  <label>Team
    <select id="team">
      <option value="">All teams</option>
      {{TEAM_OPTIONS}}
    </select>
  </label>
</div>
<div class="panel">
  <table>
    <thead id="stats-head"></thead>
    <tbody id="stats-body"><tr><td>Loading…</td></tr></tbody>
  </table>
</div>
<script>
const columns = {{COLUMNS}};
const fmt = v => v == null ? '–' : (typeof v === 'number' && !Number.isInteger(v) ? v.toFixed(2) : v);
async function load() {
  const team = document.getElementById('team').value;
  const r = await fetch('{{ENDPOINT}}?team=' + encodeURIComponent(team));
  if (!r.ok) return;
  const rows = await r.json();
  document.getElementById('stats-head').replaceChildren(
    tableRow('th', columns.map(c => c.replace(/_/g, ' '))));
  const body = document.getElementById('stats-body');
  if (!rows.length) { body.replaceChildren(tableRow('td', ['No players found'])); return; }
  body.replaceChildren(...rows.map(row => tableRow('td', columns.map(c => fmt(row[c])))));
}
function tableRow(tag, values) {
  const tr = document.createElement('tr');
  for (const v of values) {
    const cell = document.createElement(tag);
    cell.textContent = String(v);
    tr.appendChild(cell);
  }
  return tr;
}
document.getElementById('team').addEventListener('change', load);
load();
</script>"#;

const ERROR_HTML: &str = r#"<div class="panel">
  <h2 class="error">{{KIND}}</h2>
  <p>{{MESSAGE}}</p>
  <p><a href="javascript:history.back()">← Back</a></p>
</div>"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup() {
        assert_eq!(
            escape_html(r#"<b>"Tom & Jerry's"</b>"#),
            "&lt;b&gt;&quot;Tom &amp; Jerry&#39;s&quot;&lt;/b&gt;"
        );
    }

    #[test]
    fn match_form_lists_every_team_and_venue() {
        let html = match_form_page();
        for team in Team::ALL {
            assert!(html.contains(&format!(r#"<option value="{}">"#, team.name())));
        }
        assert!(html.contains(r#"<option value="Chester-le-Street">"#));
        assert!(!html.contains("{{"));
    }

    #[test]
    fn error_page_escapes_user_input() {
        let err = AppError::validation("venue", "unknown venue '<script>'");
        let html = error_page(&err);
        assert!(html.contains("ValidationError"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>'"));
    }

    #[test]
    fn score_page_shows_prediction_only_when_present() {
        assert!(score_page(Some(287)).contains("<strong>287</strong>"));
        assert!(score_page(None).contains("hidden"));
    }

    #[test]
    fn stats_pages_point_at_their_endpoints() {
        assert!(batting_stats_page().contains("/api/player_stats"));
        assert!(bowling_stats_page().contains("/api/bowl_stats"));
    }

    #[test]
    fn stats_rows_are_inserted_as_text() {
        for html in [batting_stats_page(), bowling_stats_page()] {
            assert!(html.contains("cell.textContent"));
            assert!(!html.contains("innerHTML"));
        }
    }
}
