use crate::chart;
use crate::models::{
    Category, DonutChart, MacroEntry, Settings, Snapshot, TodoRecord, WorkoutRecord,
};
use std::fmt::Write;

const DONE_COLOR: &str = "#50e3c2";
const REMAINING_COLOR: &str = "#f5a623";
const CHART_SIZE: f64 = 160.0;

pub fn render_home(snapshot: &Snapshot, settings: &Settings) -> String {
    let palette = Palette::new(settings.dark_mode);
    INDEX_HTML
        .replace("{{BG}}", palette.background)
        .replace("{{INK}}", palette.ink)
        .replace("{{MUTED}}", palette.muted)
        .replace("{{FONT_FAMILY}}", font_stack(&settings.font_family))
        .replace("{{FONT_WEIGHT}}", &settings.font_weight.to_string())
        .replace("{{CHART}}", &todo_chart_svg(snapshot))
        .replace("{{TODOS_PCT}}", &snapshot.todos_pct.to_string())
        .replace("{{PROGRESS}}", &progress_rows(snapshot))
        .replace("{{RECENT_TODOS}}", &recent_todos(&snapshot.recent_todos))
        .replace("{{RECENT_EXERCISES}}", &recent_exercises(&snapshot.recent_exercises))
        .replace("{{RECENT_MEALS}}", &recent_meals(&snapshot.recent_macro_entries))
}

struct Palette {
    background: &'static str,
    ink: &'static str,
    muted: &'static str,
}

impl Palette {
    fn new(dark: bool) -> Self {
        if dark {
            Self {
                background: "#111",
                ink: "#eee",
                muted: "#aaa",
            }
        } else {
            Self {
                background: "#fff",
                ink: "#111",
                muted: "#666",
            }
        }
    }
}

fn font_stack(family: &str) -> &'static str {
    match family {
        "Times New Roman" => "\"Times New Roman\", serif",
        "Georgia" => "Georgia, serif",
        "Verdana" => "Verdana, sans-serif",
        "Courier New" => "\"Courier New\", monospace",
        "Comic Sans MS" => "\"Comic Sans MS\", cursive",
        _ => "Arial, sans-serif",
    }
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

/// Done vs remaining. With no todos at all the remaining slice gets a unit
/// weight so the ring shows in the "remaining" color.
fn todo_chart_svg(snapshot: &Snapshot) -> String {
    let remaining = if snapshot.todos_remaining > 0 {
        snapshot.todos_remaining as f64
    } else if snapshot.todos == 0 {
        1.0
    } else {
        0.0
    };
    let categories = [
        Category::new("Done", snapshot.todos_done as f64, DONE_COLOR),
        Category::new("Remaining", remaining, REMAINING_COLOR),
    ];
    chart_svg(&chart::render(&categories, CHART_SIZE))
}

pub fn chart_svg(chart: &DonutChart) -> String {
    let (size, paths) = match chart {
        DonutChart::Ring { size, ring } => (*size, std::slice::from_ref(ring)),
        DonutChart::Sectors { size, sectors } => (*size, sectors.as_slice()),
    };
    let half = size / 2.0;
    let mut svg = format!(
        r#"<svg width="{size}" height="{size}" viewBox="0 0 {size} {size}" aria-hidden="true"><g transform="translate({half},{half})">"#
    );
    for path in paths {
        let _ = write!(
            svg,
            r##"<path d="{}" fill="{}" fill-rule="evenodd" stroke="#fff" stroke-width="2"><title>{}</title></path>"##,
            path.path,
            escape(&path.color),
            escape(&path.label)
        );
    }
    svg.push_str("</g></svg>");
    svg
}

fn progress_rows(snapshot: &Snapshot) -> String {
    let rows = [
        ("Workouts", "#4a90e2", snapshot.exercises_pct),
        ("Water Goal", "#7ed321", snapshot.water_pct),
        ("Macros", "#50e3c2", snapshot.macros_pct),
    ];
    let mut html = String::new();
    for (label, color, pct) in rows {
        let _ = write!(
            html,
            r#"<div class="progress-row"><span class="swatch" style="background:{color}"></span><div class="grow"><div class="row-head"><strong>{label}</strong><span class="muted">{pct}%</span></div><progress value="{}" max="100"></progress></div></div>"#,
            pct.min(100)
        );
    }
    html
}

fn empty_item(message: &str) -> String {
    format!(r#"<li class="muted">{message}</li>"#)
}

fn recent_todos(todos: &[TodoRecord]) -> String {
    if todos.is_empty() {
        return empty_item("No to-dos");
    }
    todos
        .iter()
        .map(|todo| {
            let (class, status) = if todo.done {
                ("done", "Done")
            } else {
                ("pending", "Pending")
            };
            format!(
                r#"<li><span>{}</span><span class="{class}">{status}</span></li>"#,
                escape(&todo.text)
            )
        })
        .collect()
}

fn recent_exercises(workouts: &[WorkoutRecord]) -> String {
    if workouts.is_empty() {
        return empty_item("No recent exercises");
    }
    workouts
        .iter()
        .map(|workout| {
            let weight = if workout.weight.is_empty() {
                String::new()
            } else {
                format!(" @ {}", escape(&workout.weight))
            };
            format!(
                r#"<li><div class="title">{}</div><div class="muted">{}×{}{weight}</div></li>"#,
                escape(&workout.name),
                workout.sets,
                workout.reps
            )
        })
        .collect()
}

fn recent_meals(entries: &[MacroEntry]) -> String {
    if entries.is_empty() {
        return empty_item("No recent meals");
    }
    entries
        .iter()
        .map(|entry| {
            format!(
                r#"<li><div class="title">{} kcal</div><div class="muted">{}g P • {}g C • {}g F</div></li>"#,
                entry.cal, entry.protein, entry.carbs, entry.fat
            )
        })
        .collect()
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Health &amp; Fitness Tracker</title>
  <style>
    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      background: {{BG}};
      color: {{INK}};
      font-family: {{FONT_FAMILY}};
      font-weight: {{FONT_WEIGHT}};
    }

    header {
      padding: 12px 16px;
      border-bottom: 1px solid #e6e6e6;
    }

    header h1 {
      margin: 0;
      font-size: 1.125rem;
      font-weight: 600;
    }

    main {
      display: flex;
      gap: 16px;
      flex-wrap: wrap;
      justify-content: center;
      padding: 16px;
    }

    .muted {
      color: {{MUTED}};
    }

    .card {
      min-width: 240px;
    }

    .progress-row {
      display: flex;
      gap: 8px;
      align-items: center;
      width: 360px;
      margin-bottom: 8px;
    }

    .swatch {
      width: 10px;
      height: 10px;
      border-radius: 2px;
      display: inline-block;
    }

    .grow {
      flex: 1;
    }

    .row-head {
      display: flex;
      justify-content: space-between;
      font-size: 12px;
    }

    progress {
      width: 100%;
      height: 8px;
    }

    ul {
      list-style: none;
      padding: 0;
      margin: 0 0 12px 0;
      max-height: 120px;
      overflow: auto;
    }

    li {
      padding: 6px;
      border-bottom: 1px solid #f3f3f3;
      display: flex;
      flex-direction: column;
      font-size: 13px;
    }

    li .title {
      font-weight: 600;
    }

    .done {
      color: #2ecc71;
    }

    .pending {
      color: #e67e22;
    }
  </style>
</head>
<body>
  <header>
    <h1>Health &amp; Fitness Tracker</h1>
    <small class="muted">Workouts, macros, water, timer, and more</small>
  </header>
  <main>
    <section class="card">
      <h3>To-Do Completion</h3>
      {{CHART}}
      <div class="row-head"><strong>Completed</strong><span class="muted">{{TODOS_PCT}}%</span></div>
      <progress value="{{TODOS_PCT}}" max="100"></progress>
    </section>
    <section class="card">
      <h3>Key Progress</h3>
      {{PROGRESS}}
      <h3>Recent To-Dos</h3>
      <ul>{{RECENT_TODOS}}</ul>
      <h3>Recent Exercises</h3>
      <ul>{{RECENT_EXERCISES}}</ul>
      <h3>Recent Meals</h3>
      <ul>{{RECENT_MEALS}}</ul>
    </section>
  </main>
  <script>
    let seen = null;

    async function poll() {
      try {
        const res = await fetch('/api/snapshot');
        if (!res.ok) return;
        const body = await res.text();
        if (seen !== null && body !== seen) {
          window.location.reload();
          return;
        }
        seen = body;
      } catch (err) {
        // server restarting; try again on the next tick
      }
    }

    poll();
    setInterval(poll, 3000);
  </script>
</body>
</html>
"#;
