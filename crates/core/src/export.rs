use crate::config::RenderConfig;
use crate::error::Result;
use crate::render::{RenderSession, TOOLTIP_ID};
use crate::scene::{escape, Surface};

pub fn to_csv(session: &RenderSession, mut w: impl std::io::Write) -> Result<()> {
    let mut writer = csv::Writer::from_writer(&mut w);
    writer.write_record(["name", "category", "value", "x0", "y0", "x1", "y1", "fill"])?;
    for t in &session.tiles {
        writer.write_record([
            t.name.clone(),
            t.category.clone(),
            t.value.to_string(),
            t.rect.x0.to_string(),
            t.rect.y0.to_string(),
            t.rect.x1.to_string(),
            t.rect.y1.to_string(),
            t.fill.to_hex(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

pub fn to_json(session: &RenderSession) -> serde_json::Value {
    serde_json::json!({
        "total": session.hierarchy.total_value(),
        "categories": session.legend.iter().map(|e| serde_json::json!({
            "name": e.category,
            "color": e.fill.to_hex(),
            "x": e.x,
            "y": e.y,
        })).collect::<Vec<_>>(),
        "tiles": session.tiles.iter().map(|t| serde_json::json!({
            "name": t.name,
            "category": t.category,
            "value": t.value,
            "fill": t.fill.to_hex(),
            "x0": t.rect.x0,
            "y0": t.rect.y0,
            "x1": t.rect.x1,
            "y1": t.rect.y1,
            "label": t.label.iter().map(|l| l.text.as_str()).collect::<Vec<_>>(),
        })).collect::<Vec<_>>()
    })
}

/// Standalone page: chart, legend, tooltip overlay and the hover script.
pub fn to_html(config: &RenderConfig, svg: &Surface, legend: &Surface) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>{title}</title>
    <style>{css}</style>
</head>
<body>
    <h1 id="title">{title}</h1>
    <p id="description">{description}</p>
    <div id="chart-div" style="width: {width}px">
{chart}
        <div id="{tooltip}" class="tooltip-div" style="opacity: 0"></div>
    </div>
{legend}
    <script>{js}</script>
</body>
</html>
"#,
        title = escape(&config.title),
        description = escape(&config.description),
        width = svg.width,
        chart = svg.to_svg(),
        legend = legend.to_svg(),
        tooltip = TOOLTIP_ID,
        css = INLINE_CSS,
        js = INLINE_JS,
    )
}

const INLINE_CSS: &str = r#"
body { font-family: sans-serif; margin: 2rem; color: #222; }
#title, #description { text-align: center; }
#chart-div { position: relative; margin: 0 auto; }
.tile-text { font-size: 10px; pointer-events: none; }
.legend-text { font-size: 12px; }
.tooltip-div {
    position: absolute;
    padding: 6px 8px;
    font-size: 12px;
    background: #fffbe6;
    border: 1px solid #999;
    border-radius: 4px;
    pointer-events: none;
    white-space: nowrap;
}
"#;

const INLINE_JS: &str = r#"
(function () {
    var tooltip = document.getElementById('tooltip');
    var money = new Intl.NumberFormat('en-US', { style: 'currency', currency: 'USD', maximumFractionDigits: 0 });
    document.querySelectorAll('rect.tile').forEach(function (tile) {
        tile.addEventListener('mouseover', function (ev) {
            var value = Number(tile.getAttribute('data-value'));
            var name = document.createElement('strong');
            name.textContent = tile.getAttribute('data-name');
            var category = document.createElement('em');
            category.textContent = tile.getAttribute('data-category');
            tooltip.replaceChildren(
                name, document.createElement('br'),
                category, document.createElement('br'),
                document.createTextNode(money.format(value))
            );
            tooltip.setAttribute('data-value', value);
            tooltip.style.opacity = 0.9;
            tooltip.style.left = (ev.pageX + 10) + 'px';
            tooltip.style.top = (ev.pageY - 28) + 'px';
        });
        tile.addEventListener('mouseout', function () {
            tooltip.style.opacity = 0;
        });
    });
})();
"#;
