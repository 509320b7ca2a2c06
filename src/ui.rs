use crate::calendar::group_by_day;
use crate::config::{MoodPalette, VizConfig};
use crate::locations::{default_location_group, location_groups, location_label, location_stats};
use crate::models::{DayGroup, Entry, LocationGroup, Summary, TimeOfDay};
use crate::stats::summarize;

pub fn render_index(entries: &[Entry], config: &VizConfig) -> String {
    let calendar = if entries.is_empty() {
        r#"<p class="placeholder">Nothing logged yet.</p>"#.to_string()
    } else {
        render_calendar(&group_by_day(entries), &config.palette)
    };

    INDEX_HTML
        .replace("{{SUMMARY}}", &render_summary(&summarize(entries)))
        .replace("{{CALENDAR}}", &calendar)
        .replace("{{LOCATIONS}}", &render_location_explorer(&location_groups(entries)))
        .replace("{{OUTLIERS}}", &render_outliers(&location_stats(entries).single_visit))
        .replace("{{LEGEND}}", &render_legend(&config.palette))
}

pub fn render_summary(summary: &Summary) -> String {
    format!(
        r#"<div class="stat"><span class="label">Total days recorded</span><span class="value">{}</span><span class="sub">{} entries logged</span></div>"#,
        summary.total_days, summary.total_entries
    )
}

pub fn render_outliers(labels: &[String]) -> String {
    if labels.is_empty() {
        return r#"<p class="placeholder">No single-visit locations, nice and consistent!</p>"#
            .to_string();
    }

    let pills: String = labels
        .iter()
        .map(|label| format!(r#"<span class="pill">{}</span>"#, escape_html(label)))
        .collect();
    format!(r#"<div class="outlier-title">Single-visit locations</div><div class="pill-list">{pills}</div>"#)
}

fn render_legend(palette: &MoodPalette) -> String {
    palette
        .iter()
        .map(|(mood, color)| {
            format!(
                r#"<span class="legend-item"><i style="background:{}"></i>{}</span>"#,
                escape_html(color),
                escape_html(mood)
            )
        })
        .collect()
}

/// Time slots as rows, one column per day.
pub fn render_calendar(days: &[DayGroup], palette: &MoodPalette) -> String {
    let mut html = format!(
        r#"<div class="timeline-grid" style="grid-template-columns: 100px repeat({}, 160px)"><div class="corner">Time of day</div>"#,
        days.len()
    );

    for day in days {
        html.push_str(&format!(
            r#"<div class="date-header"><strong>{}</strong><span>{}</span></div>"#,
            escape_html(&day.label),
            day.iso_date
        ));
    }

    for slot in TimeOfDay::ALL {
        html.push_str(&format!(r#"<div class="time-label">{}</div>"#, slot.as_str()));
        for day in days {
            html.push_str(&render_cell(day.entries.get(&slot), palette));
        }
    }

    html.push_str("</div>");
    html
}

fn render_cell(entry: Option<&Entry>, palette: &MoodPalette) -> String {
    let Some(entry) = entry else {
        return r#"<div class="photo-cell empty"></div>"#.to_string();
    };

    let time = entry.exact_time.as_deref().unwrap_or("00:00");
    let location = location_label(entry);
    let food_line = entry
        .food_items
        .as_deref()
        .map(|food| format!(r#"<div class="food-line">What I ate: {}</div>"#, escape_html(food)))
        .unwrap_or_default();
    let title_food = entry
        .food_items
        .as_deref()
        .map(|food| format!(" · {food}"))
        .unwrap_or_default();

    format!(
        r#"<div class="photo-cell" style="border-color:{color}" title="{title}"><img src="{img}" alt=""><div class="photo-info"><div>{time} · {location}</div>{food_line}</div></div>"#,
        color = escape_html(palette.color_for(entry.mood_key())),
        title = escape_html(&format!("{} {time} · {location}{title_food}", entry.date)),
        img = escape_html(entry.img.as_deref().unwrap_or_default()),
        time = escape_html(time),
        location = escape_html(&location),
    )
}

/// Button list plus one feed per location; the largest group starts visible.
pub fn render_location_explorer(groups: &[LocationGroup]) -> String {
    if groups.is_empty() {
        return r#"<p class="placeholder">Select a location once entries are logged.</p>"#
            .to_string();
    }

    let default_label = default_location_group(groups).map(|group| group.label.as_str());
    let mut buttons = String::new();
    let mut feeds = String::new();
    for (index, group) in groups.iter().enumerate() {
        let active = if Some(group.label.as_str()) == default_label { " active" } else { "" };
        let label = escape_html(&group.label);
        buttons.push_str(&format!(
            r#"<button class="location-btn{active}" data-target="loc-{index}">{label} ({})</button>"#,
            group.count
        ));
        let noun = if group.count == 1 { "entry" } else { "entries" };
        feeds.push_str(&format!(
            r#"<div class="location-feed{active}" id="loc-{index}"><h3>{label}</h3><p>{} {noun} documented.</p><div class="location-entries">"#,
            group.count
        ));
        for entry in &group.entries {
            feeds.push_str(&render_entry_card(entry));
        }
        feeds.push_str("</div></div>");
    }

    format!(r#"<div class="location-list">{buttons}</div><div class="location-feeds">{feeds}</div>"#)
}

fn render_entry_card(entry: &Entry) -> String {
    let food_line = entry
        .food_items
        .as_deref()
        .map(|food| format!(r#"<span class="food-line">What I ate: {}</span>"#, escape_html(food)))
        .unwrap_or_default();
    let slot = entry.time_of_day.map(TimeOfDay::as_str).unwrap_or("—");
    let satisfaction = match &entry.satisfaction {
        Some(serde_json::Value::String(text)) => text.clone(),
        Some(value) if !value.is_null() => value.to_string(),
        _ => "—".to_string(),
    };

    format!(
        r#"<div class="location-entry"><img src="{img}" alt="{alt}"><div class="location-entry-details"><strong>{date} · {slot}</strong>{food_line}<span>{note}</span><span>Emotion: {emotion} · Satisfaction: {satisfaction}</span></div></div>"#,
        img = escape_html(entry.img.as_deref().unwrap_or_default()),
        alt = escape_html(&location_label(entry)),
        date = escape_html(&entry.date),
        note = escape_html(entry.diary_note()),
        emotion = escape_html(entry.emotion.as_deref().unwrap_or("n/a")),
        satisfaction = escape_html(&satisfaction),
    )
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Photo Diary</title>
  <style>
    @import url('https://fonts.googleapis.com/css2?family=Space+Grotesk:wght@400;500;600&family=Fraunces:wght@600&display=swap');

    :root {
      --bg-1: #f8f3e6;
      --bg-2: #f5d3a7;
      --ink: #2b2a28;
      --accent: #ff6b4a;
      --accent-2: #2f4858;
      --card: rgba(255, 255, 255, 0.86);
      --shadow: 0 24px 60px rgba(47, 72, 88, 0.18);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: radial-gradient(circle at top, var(--bg-2), transparent 60%),
        linear-gradient(135deg, var(--bg-1), #ffe9d4 60%, #f9f2e9 100%);
      color: var(--ink);
      font-family: "Space Grotesk", "Trebuchet MS", sans-serif;
      padding: 32px 18px 48px;
    }

    .app {
      width: min(1100px, 100%);
      margin: 0 auto;
      background: var(--card);
      backdrop-filter: blur(12px);
      border-radius: 28px;
      box-shadow: var(--shadow);
      padding: 36px;
      display: grid;
      gap: 28px;
    }

    h1 {
      font-family: "Fraunces", "Georgia", serif;
      font-weight: 600;
      font-size: clamp(2rem, 4vw, 2.8rem);
      margin: 0;
    }

    h2 {
      margin: 0 0 12px;
      font-size: 1.2rem;
      color: var(--accent-2);
    }

    .placeholder {
      color: #8b857d;
    }

    .stat {
      background: white;
      border-radius: 18px;
      padding: 18px;
      border: 1px solid rgba(47, 72, 88, 0.08);
      display: grid;
      gap: 6px;
      max-width: 260px;
    }

    .stat .label {
      font-size: 0.85rem;
      text-transform: uppercase;
      letter-spacing: 0.12em;
      color: #8b857d;
    }

    .stat .value {
      font-size: 1.7rem;
      font-weight: 600;
      color: var(--accent-2);
    }

    .timeline-scroll {
      overflow-x: auto;
    }

    .timeline-grid {
      display: grid;
      gap: 8px;
    }

    .date-header, .time-label, .corner {
      font-size: 0.85rem;
      color: #5f5c57;
    }

    .date-header span {
      display: block;
      font-size: 0.75rem;
    }

    .photo-cell {
      min-height: 120px;
      border-radius: 14px;
      border: 4px solid transparent;
      background: white;
      overflow: hidden;
      font-size: 0.75rem;
    }

    .photo-cell.empty {
      background: rgba(47, 72, 88, 0.05);
    }

    .photo-cell img {
      width: 100%;
      height: 80px;
      object-fit: cover;
      display: block;
    }

    .photo-info {
      padding: 6px 8px;
    }

    .legend-item {
      margin-right: 14px;
      font-size: 0.85rem;
    }

    .legend-item i {
      display: inline-block;
      width: 12px;
      height: 12px;
      border-radius: 50%;
      margin-right: 6px;
    }

    .explorer {
      display: grid;
      grid-template-columns: 240px 1fr;
      gap: 18px;
    }

    .location-list {
      display: grid;
      gap: 8px;
      align-content: start;
    }

    .location-btn {
      appearance: none;
      border: none;
      border-radius: 999px;
      padding: 10px 14px;
      background: white;
      cursor: pointer;
      text-align: left;
      font: inherit;
    }

    .location-btn.active {
      background: var(--accent-2);
      color: white;
    }

    .location-feed {
      display: none;
    }

    .location-feed.active {
      display: block;
    }

    .location-entry {
      display: grid;
      grid-template-columns: 120px 1fr;
      gap: 12px;
      margin-bottom: 12px;
    }

    .location-entry img {
      width: 120px;
      border-radius: 12px;
    }

    .location-entry-details span {
      display: block;
      font-size: 0.85rem;
    }

    .pill {
      display: inline-block;
      background: white;
      border-radius: 999px;
      padding: 4px 12px;
      margin: 4px;
      font-size: 0.85rem;
    }

    .charts {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(320px, 1fr));
      gap: 18px;
    }

    .chart-card {
      background: white;
      border-radius: 20px;
      padding: 16px;
      border: 1px solid rgba(47, 72, 88, 0.08);
    }

    .chart-card svg {
      width: 100%;
      height: 260px;
      display: block;
    }

    .chart-line {
      fill: none;
      stroke: var(--accent);
      stroke-width: 3;
    }

    .chart-line.daily {
      stroke: rgba(47, 72, 88, 0.35);
      stroke-width: 2;
    }

    .chart-point {
      fill: white;
      stroke: var(--accent);
      stroke-width: 2;
    }

    .chart-bar {
      fill: var(--accent-2);
    }

    .chart-grid {
      stroke: rgba(47, 72, 88, 0.12);
    }

    .chart-label {
      fill: #7a746d;
      font-size: 11px;
    }
  </style>
</head>
<body>
  <main class="app">
    <header>
      <h1>Photo Diary</h1>
    </header>

    <section id="viz-summary">{{SUMMARY}}</section>

    <section>
      <h2>Calendar</h2>
      <div class="legend">{{LEGEND}}</div>
      <div class="timeline-scroll" id="calendar">{{CALENDAR}}</div>
    </section>

    <section>
      <h2>Locations</h2>
      <div class="explorer" id="location-explorer">{{LOCATIONS}}</div>
      <div id="location-outliers">{{OUTLIERS}}</div>
    </section>

    <section class="charts">
      <div class="chart-card">
        <h2>Satisfaction over time</h2>
        <svg id="chart-satisfaction" viewBox="0 0 600 260"></svg>
      </div>
      <div class="chart-card">
        <h2>Frequency by location (percent of visits)</h2>
        <svg id="chart-locations" viewBox="0 0 600 260"></svg>
      </div>
      <div class="chart-card">
        <h2>Meal time (percent of days)</h2>
        <svg id="chart-meals" viewBox="0 0 600 260"></svg>
      </div>
      <div class="chart-card">
        <h2>Core meals (percent of days)</h2>
        <svg id="chart-core-meals" viewBox="0 0 600 260"></svg>
      </div>
    </section>
  </main>

  <script>
    document.querySelectorAll('.location-btn').forEach((button) => {
      button.addEventListener('click', () => {
        document.querySelectorAll('.location-btn.active, .location-feed.active')
          .forEach((el) => el.classList.remove('active'));
        button.classList.add('active');
        const feed = document.getElementById(button.dataset.target);
        if (feed) {
          feed.classList.add('active');
        }
      });
    });

    const width = 600;
    const height = 260;
    const paddingX = 44;
    const paddingY = 34;
    const top = 24;

    const escapeText = (value) => String(value)
      .replace(/&/g, '&amp;')
      .replace(/</g, '&lt;')
      .replace(/>/g, '&gt;');

    const emptyChart = (el, message) => {
      el.innerHTML = `<text class="chart-label" x="50%" y="50%" text-anchor="middle">${message}</text>`;
    };

    const renderLineChart = (el, points, daily, smoothed) => {
      if (!el) {
        return;
      }
      if (!smoothed.length) {
        emptyChart(el, 'No satisfaction scores yet');
        return;
      }

      const values = points.concat(daily, smoothed).map((point) => point.value);
      let min = Math.min(...values);
      let max = Math.max(...values);
      if (min === max) {
        min -= 1;
        max += 1;
      }

      const range = max - min;
      const xStep = smoothed.length > 1 ? (width - paddingX * 2) / (smoothed.length - 1) : 0;
      const scaleY = (height - top - paddingY) / range;
      const x = (index) => paddingX + index * xStep;
      const y = (value) => height - paddingY - (value - min) * scaleY;
      const path = (points) => points
        .map((point, index) => `${index === 0 ? 'M' : 'L'} ${x(index).toFixed(2)} ${y(point.value).toFixed(2)}`)
        .join(' ');

      let grid = '';
      for (let i = 0; i <= 4; i += 1) {
        const value = min + (range * i) / 4;
        grid += `<line class="chart-grid" x1="${paddingX}" y1="${y(value)}" x2="${width - paddingX}" y2="${y(value)}" />`;
        grid += `<text class="chart-label" x="${paddingX - 10}" y="${y(value) + 4}" text-anchor="end">${Math.round(value * 10) / 10}</text>`;
      }

      const labelEvery = smoothed.length > 8 ? 2 : 1;
      const labels = smoothed
        .map((point, index) => index % labelEvery !== 0 ? '' :
          `<text class="chart-label" x="${x(index)}" y="${height - paddingY + 18}" text-anchor="middle">${point.date.slice(5)}</text>`)
        .join('');
      const dayIndex = new Map(daily.map((point, index) => [point.date, index]));
      const circles = points
        .filter((point) => dayIndex.has(point.date))
        .map((point) => `<circle class="chart-point" cx="${x(dayIndex.get(point.date))}" cy="${y(point.value)}" r="4" />`)
        .join('');

      el.innerHTML = `${grid}<path class="chart-line daily" d="${path(daily)}" /><path class="chart-line" d="${path(smoothed)}" />${circles}${labels}`;
    };

    const renderBarChart = (el, rows, emptyMessage) => {
      if (!el) {
        return;
      }
      if (!rows.length) {
        emptyChart(el, emptyMessage);
        return;
      }

      const labelWidth = 150;
      const barSpace = (height - top) / rows.length;
      const maxPercent = Math.max(100, ...rows.map((row) => row.percent));
      const scale = (width - labelWidth - paddingX) / maxPercent;

      el.innerHTML = rows.map((row, index) => {
        const yPos = top + index * barSpace;
        const barHeight = Math.max(barSpace - 10, 4);
        return `
          <text class="chart-label" x="${labelWidth - 8}" y="${yPos + barHeight / 2 + 4}" text-anchor="end">${escapeText(row.label)}</text>
          <rect class="chart-bar" x="${labelWidth}" y="${yPos}" width="${row.percent * scale}" height="${barHeight}" rx="6" />
          <text class="chart-label" x="${labelWidth + row.percent * scale + 6}" y="${yPos + barHeight / 2 + 4}">${row.count} (${row.percent}%)</text>
        `;
      }).join('');
    };

    const loadCharts = async () => {
      try {
        const res = await fetch('/api/stats');
        if (!res.ok) {
          return;
        }
        const report = await res.json();
        if (!report.summary.total_entries) {
          return;
        }
        renderLineChart(document.getElementById('chart-satisfaction'),
          report.satisfaction_points, report.satisfaction_daily, report.satisfaction_trend);
        renderBarChart(document.getElementById('chart-locations'), report.locations.frequent,
          'No repeat locations yet, keep logging visits to see this chart.');
        renderBarChart(document.getElementById('chart-meals'), report.meals, 'No meals logged');
        renderBarChart(document.getElementById('chart-core-meals'), report.core_meals, 'No meals logged');
      } catch (err) {
        console.warn('charts unavailable', err);
      }
    };

    loadCharts();
  </script>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(date: &str, slot: TimeOfDay, location: &str) -> Entry {
        Entry {
            date: date.into(),
            exact_time: Some("08:30".into()),
            time_of_day: Some(slot),
            specific_location: Some(location.into()),
            color_mood: Some("happy".into()),
            ..Entry::default()
        }
    }

    #[test]
    fn empty_dataset_renders_placeholders() {
        let html = render_index(&[], &VizConfig::default());
        assert!(html.contains("Nothing logged yet."));
        assert!(html.contains("No single-visit locations"));
        assert!(!html.contains("{{"));
    }

    #[test]
    fn calendar_cells_use_mood_colour() {
        let entries = vec![entry("2025-11-10", TimeOfDay::Morning, "Home")];
        let html = render_calendar(&group_by_day(&entries), &MoodPalette::default());
        assert!(html.contains("Mon, Nov 10"));
        assert!(html.contains("border-color:#ff7f50"));
        assert!(html.contains("08:30 · Home"));
        assert_eq!(html.matches("photo-cell empty").count(), 4);
    }

    #[test]
    fn explorer_activates_largest_group() {
        let entries = vec![
            entry("2025-11-10", TimeOfDay::Morning, "Cafe"),
            entry("2025-11-10", TimeOfDay::Noon, "Park"),
            entry("2025-11-11", TimeOfDay::Noon, "Park"),
        ];
        let html = render_location_explorer(&location_groups(&entries));
        assert!(html.contains(r#"<button class="location-btn active" data-target="loc-0">Park (2)</button>"#));
        assert!(html.contains("2 entries documented."));
        assert!(html.contains("1 entry documented."));
        assert_eq!(html.matches("location-btn active").count(), 1);
        assert_eq!(html.matches("location-feed active").count(), 1);
        assert!(html.contains(r#"<div class="location-feed active" id="loc-0"><h3>Park</h3>"#));
    }

    #[test]
    fn satisfaction_chart_plots_each_entry() {
        let html = render_index(&[], &VizConfig::default());
        assert!(html.contains("report.satisfaction_points, report.satisfaction_daily, report.satisfaction_trend"));
        assert!(html.contains(r#"<path class="chart-line daily""#));
    }

    #[test]
    fn user_text_is_escaped() {
        let html = render_outliers(&["<b>Joe's</b>".to_string()]);
        assert!(html.contains("&lt;b&gt;Joe&#39;s&lt;/b&gt;"));
    }
}
