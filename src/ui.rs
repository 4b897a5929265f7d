use crate::clock::time_label;
use crate::layout::{layout, ChartArea, HeatGrid};
use crate::view::ViewState;
use chrono::{DateTime, Local};
use std::fmt::Write;

const VIEW_WIDTH: f64 = 960.0;
const VIEW_HEIGHT: f64 = 200.0;

pub const CHART_AREA: ChartArea = ChartArea {
    left: 8.0,
    top: 8.0,
    width: VIEW_WIDTH - 8.0 - 32.0,
    height: VIEW_HEIGHT - 8.0 - 28.0,
};

pub fn render_index(
    started_at: DateTime<Local>,
    now: DateTime<Local>,
    state: &ViewState,
    chart_svg: &str,
    chart_revision: u64,
) -> String {
    let refreshed = state
        .refreshed_at
        .map(time_label)
        .unwrap_or_else(|| "--".to_string());
    INDEX_HTML
        .replace("{{STARTED}}", &time_label(started_at))
        .replace("{{NOW}}", &time_label(now))
        .replace("{{REFRESHED}}", &refreshed)
        .replace("{{REVISION}}", &chart_revision.to_string())
        .replace("{{CHART}}", chart_svg)
}

pub fn render_chart(state: &ViewState) -> String {
    let samples = state.samples.as_deref().map(Vec::as_slice).unwrap_or(&[]);
    render_grid(&layout(samples, CHART_AREA))
}

fn render_grid(grid: &HeatGrid) -> String {
    let mut svg = String::new();
    let _ = write!(
        svg,
        r#"<svg id="heatmap" viewBox="0 0 {VIEW_WIDTH} {VIEW_HEIGHT}" role="img" aria-label="Heatmap">"#
    );

    for cell in &grid.cells {
        let [date_line, value_line] = cell.tooltip();
        let _ = write!(
            svg,
            r#"<rect class="cell" x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" rx="1" fill="{}"><title>{}&#10;{}</title></rect>"#,
            cell.x,
            cell.y,
            cell.width,
            cell.height,
            cell.fill(),
            escape(&date_line),
            escape(&value_line),
        );
    }

    let area = grid.area;
    for tick in &grid.weekday_ticks {
        let _ = write!(
            svg,
            r#"<text class="axis" x="{:.2}" y="{:.2}" dominant-baseline="middle">{}</text>"#,
            area.right() + 4.0,
            tick.position,
            tick.label
        );
    }
    for tick in &grid.week_ticks {
        let _ = write!(
            svg,
            r#"<text class="axis" x="{:.2}" y="{:.2}" text-anchor="middle">{}</text>"#,
            tick.position,
            area.bottom() + 16.0,
            tick.label
        );
    }
    if grid.cells.is_empty() {
        let _ = write!(
            svg,
            r#"<text class="axis" x="{:.2}" y="{:.2}" text-anchor="middle">No data yet</text>"#,
            area.left + area.width / 2.0,
            area.top + area.height / 2.0
        );
    }

    svg.push_str("</svg>");
    svg
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Heatmap</title>
  <style>
    :root {
      --bg: #f4f7f2;
      --ink: #1f2a1f;
      --muted: #66735f;
      --card: #ffffff;
      --shadow: 0 18px 48px rgba(20, 60, 20, 0.12);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: var(--bg);
      color: var(--ink);
      font-family: "Trebuchet MS", sans-serif;
      display: grid;
      place-items: center;
      padding: 32px 18px 48px;
    }

    .app {
      width: min(1040px, 100%);
      background: var(--card);
      border-radius: 24px;
      box-shadow: var(--shadow);
      padding: 32px;
      display: grid;
      gap: 20px;
    }

    header {
      display: grid;
      gap: 6px;
    }

    h1 {
      margin: 0;
      font-size: clamp(1.6rem, 3vw, 2.2rem);
    }

    .subtitle {
      margin: 0;
      color: var(--muted);
    }

    .times {
      display: flex;
      flex-wrap: wrap;
      gap: 18px;
      color: var(--muted);
      font-size: 0.95rem;
    }

    time {
      font-variant-numeric: tabular-nums;
      color: var(--ink);
    }

    .chart-container {
      width: 100%;
    }

    #heatmap {
      width: 100%;
      height: auto;
      display: block;
    }

    #heatmap .cell {
      stroke: green;
      stroke-width: 1;
    }

    #heatmap .cell:hover {
      fill: rgba(200, 200, 0, 1);
      stroke: rgba(0, 200, 0, 1);
    }

    #heatmap .axis {
      fill: var(--muted);
      font-size: 9px;
    }
  </style>
</head>
<body>
  <section class="app">
    <header>
      <h1>Heatmap</h1>
      <p class="subtitle">Daily values by weekday and week, refreshed from the heat endpoint.</p>
      <p class="subtitle">
        Chart based on example at
        <a href="https://www.youtube.com/watch?v=185_Ofuq7T0">https://www.youtube.com/watch?v=185_Ofuq7T0</a>
      </p>
      <div class="times">
        <div><span>Started at </span><time id="started">{{STARTED}}</time></div>
        <div><span>Current time </span><time id="clock">{{NOW}}</time></div>
      </div>
    </header>

    <div>
      <div class="chart-container" id="chart" data-revision="{{REVISION}}">{{CHART}}</div>
      <span>Chart refreshed at </span><time id="refreshed">{{REFRESHED}}</time>
    </div>
  </section>

  <script>
    const clockEl = document.getElementById('clock');
    const refreshedEl = document.getElementById('refreshed');
    const chartEl = document.getElementById('chart');

    const label = (iso) => (iso ? new Date(iso).toLocaleTimeString() : '--');

    const loadChart = async () => {
      const res = await fetch('/api/chart');
      if (!res.ok) {
        return;
      }
      const chart = await res.json();
      chartEl.innerHTML = chart.svg;
      chartEl.dataset.revision = String(chart.revision);
    };

    const tick = async () => {
      const res = await fetch('/api/status');
      if (!res.ok) {
        return;
      }
      const status = await res.json();
      clockEl.textContent = label(status.current_time);
      refreshedEl.textContent = label(status.refreshed_at);
      if (String(status.revision) !== chartEl.dataset.revision) {
        await loadChart();
      }
    };

    setInterval(() => {
      tick().catch(() => {});
    }, 1000);
  </script>
</body>
</html>
"#;
