/// Interactive Leaflet maps.
///
/// Each map is a self-contained HTML page: the data is embedded as JSON
/// and Leaflet is loaded from its CDN when the page is opened.

use serde::Serialize;
use serde_json::json;

use crate::analysis::false_alarms::SuspectedFalseAlarm;
use crate::error::Result;
use crate::model::{Detection, IndustrialSite, MatchedPair};

use super::svg::escape_xml;

const LEAFLET_CSS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.css";
const LEAFLET_JS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.js";

pub const MODIS_COLOR: &str = "#d62728";
pub const VIIRS_COLOR: &str = "#1f77b4";
const LINK_COLOR: &str = "#7f7f7f";
const SITE_COLOR: &str = "#ff7f0e";

/// Marker payload shared by both maps.
#[derive(Serialize)]
struct MarkerData {
    source: &'static str,
    lat: f64,
    lon: f64,
    time: String,
    confidence: f64,
    brightness: Option<f64>,
    frp: Option<f64>,
}

impl From<&Detection> for MarkerData {
    fn from(d: &Detection) -> Self {
        MarkerData {
            source: d.source.as_str(),
            lat: d.latitude,
            lon: d.longitude,
            time: d.timestamp.format("%Y-%m-%d %H:%M UTC").to_string(),
            confidence: d.confidence,
            brightness: d.brightness,
            frp: d.frp,
        }
    }
}

/// Serializes `value` for inclusion inside a `<script>` element.
fn script_json<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string(value)?.replace("</", "<\\/"))
}

fn page(title: &str, data: &str, script: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{title}</title>
<link rel="stylesheet" href="{LEAFLET_CSS}">
<script src="{LEAFLET_JS}"></script>
<style>
  html, body {{ height: 100%; margin: 0; }}
  #map {{ height: 100%; }}
  .legend {{ background: white; padding: 6px 10px; line-height: 1.5; font: 13px sans-serif; }}
  .legend span {{ display: inline-block; width: 12px; height: 12px; margin-right: 6px; border-radius: 6px; }}
</style>
</head>
<body>
<div id="map"></div>
<script>
const DATA = {data};
const map = L.map('map');
L.tileLayer('https://{{s}}.tile.openstreetmap.org/{{z}}/{{x}}/{{y}}.png', {{
  maxZoom: 18,
  attribution: '&copy; OpenStreetMap contributors'
}}).addTo(map);
function popup(d) {{
  let html = '<b>' + d.source + '</b><br>' + d.time +
    '<br>lat ' + d.lat.toFixed(4) + ', lon ' + d.lon.toFixed(4) +
    '<br>confidence ' + d.confidence;
  if (d.brightness !== null) html += '<br>brightness ' + d.brightness + ' K';
  if (d.frp !== null) html += '<br>FRP ' + d.frp + ' MW';
  return html;
}}
function legend(entries) {{
  const ctl = L.control({{position: 'bottomright'}});
  ctl.onAdd = function () {{
    const div = L.DomUtil.create('div', 'legend');
    div.innerHTML = '<b>' + {title_json} + '</b><br>' + entries
      .map(e => '<span style="background:' + e[1] + '"></span>' + e[0])
      .join('<br>');
    return div;
  }};
  ctl.addTo(map);
}}
function fit(latlngs) {{
  if (latlngs.length > 0) map.fitBounds(latlngs, {{padding: [20, 20]}});
  else map.setView([51.0, 10.0], 6);
}}
{script}
</script>
</body>
</html>
"#,
        title = escape_xml(title),
        title_json = serde_json::Value::String(escape_xml(title)).to_string().replace("</", "<\\/"),
    )
}

/// Map of matched pairs: MODIS markers in red, VIIRS in blue, joined by a
/// grey line whose popup shows distance and time difference.
pub fn matches_map_html(pairs: &[MatchedPair], label: &str) -> Result<String> {
    let data: Vec<_> = pairs
        .iter()
        .map(|p| {
            json!({
                "modis": MarkerData::from(p.modis()),
                "viirs": MarkerData::from(p.viirs()),
                "distance_km": p.distance_km(),
                "diff_minutes": p.time_diff_minutes(),
            })
        })
        .collect();

    let script = format!(
        r#"const bounds = [];
DATA.forEach(p => {{
  const a = [p.modis.lat, p.modis.lon], b = [p.viirs.lat, p.viirs.lon];
  L.polyline([a, b], {{color: '{LINK_COLOR}', weight: 2}})
    .bindPopup('distance ' + p.distance_km.toFixed(2) + ' km<br>MODIS - VIIRS ' + p.diff_minutes.toFixed(1) + ' min')
    .addTo(map);
  L.circleMarker(a, {{radius: 6, color: '{MODIS_COLOR}', fillOpacity: 0.8}}).bindPopup(popup(p.modis)).addTo(map);
  L.circleMarker(b, {{radius: 6, color: '{VIIRS_COLOR}', fillOpacity: 0.8}}).bindPopup(popup(p.viirs)).addTo(map);
  bounds.push(a, b);
}});
fit(bounds);
legend([['MODIS', '{MODIS_COLOR}'], ['VIIRS', '{VIIRS_COLOR}'], ['matched pair', '{LINK_COLOR}']]);"#
    );

    Ok(page(&format!("{}: matched detections", label), &script_json(&data)?, &script))
}

/// Map of suspected false alarms on top of the industrial site boxes.
pub fn false_alarms_map_html(
    alarms: &[SuspectedFalseAlarm<'_>],
    sites: &[IndustrialSite],
    label: &str,
) -> Result<String> {
    let data = json!({
        "sites": sites
            .iter()
            .map(|s| json!({
                "name": s.name,
                "description": s.description,
                "bounds": [[s.bounds.south, s.bounds.west], [s.bounds.north, s.bounds.east]],
            }))
            .collect::<Vec<_>>(),
        "alarms": alarms
            .iter()
            .map(|a| json!({ "site": a.site.name, "detection": MarkerData::from(a.detection) }))
            .collect::<Vec<_>>(),
    });

    let script = format!(
        r#"const bounds = [];
DATA.sites.forEach(s => {{
  L.rectangle(s.bounds, {{color: '{SITE_COLOR}', weight: 2, fillOpacity: 0.1}})
    .bindPopup('<b>' + s.name + '</b><br>' + s.description)
    .addTo(map);
}});
DATA.alarms.forEach(a => {{
  const d = a.detection;
  const color = d.source === 'MODIS' ? '{MODIS_COLOR}' : '{VIIRS_COLOR}';
  L.circleMarker([d.lat, d.lon], {{radius: 6, color: color, fillOpacity: 0.8}})
    .bindPopup(popup(d) + '<br>site: ' + a.site)
    .addTo(map);
  bounds.push([d.lat, d.lon]);
}});
fit(bounds);
legend([['MODIS', '{MODIS_COLOR}'], ['VIIRS', '{VIIRS_COLOR}'], ['industrial site', '{SITE_COLOR}']]);"#
    );

    Ok(page(&format!("{}: suspected false alarms", label), &script_json(&data)?, &script))
}
