/// Representative laghi.net widget payloads for tests.
///
/// The BootWidgetData response for widget 370 is an envelope
/// `{ "success": bool, "data": [lake, ...] }`. Each lake object pairs a
/// `tooltip_config.series` list of descriptors with a `tooltip_data` list
/// that is correlated to it by array position only:
///
/// ```text
/// tooltip_config.series[i].id  <->  tooltip_data[i].anagrafica_serie / data_serie
/// ```
///
/// `data_serie` is ordered newest first; timestamps are local wall-clock
/// strings `YYYY-MM-DD HH:MM`.

/// Single lake, level + fill only. Inflow and outflow fall back to defaults.
#[cfg(test)]
pub(crate) fn fixture_garda_json() -> &'static str {
    r#"{"success": true, "data": [{"tooltip_config": {"titolo": "Lago di Garda", "series": [{"id": 3}, {"id": 6}]}, "tooltip_data": [{"anagrafica_serie": {"UnMis": "m"}, "data_serie": [{"val": 65.2, "data": "2024-06-01 08:00"}]}, {"anagrafica_serie": {"UnMis": "%"}, "data_serie": [{"val": 74, "data": "2024-06-01 08:00"}]}]}]}"#
}

/// Two lakes with all four series, descriptors in different orders and
/// an extra unknown series (id 9) on Como.
#[cfg(test)]
pub(crate) fn fixture_two_lakes_json() -> &'static str {
    r#"{
      "success": true,
      "data": [
        {
          "tooltip_config": {
            "titolo": "Lago Maggiore",
            "series": [
              { "id": 3, "nome": "Livello" },
              { "id": 4, "nome": "Afflusso" },
              { "id": 5, "nome": "Deflusso" },
              { "id": 6, "nome": "Riempimento" }
            ]
          },
          "tooltip_data": [
            { "anagrafica_serie": { "UnMis": "m" },
              "data_serie": [ { "val": 193.41, "data": "2024-03-15 14:30" }, { "val": 193.38, "data": "2024-03-15 08:00" } ] },
            { "anagrafica_serie": { "UnMis": "m³/s" },
              "data_serie": [ { "val": 212.0, "data": "2024-03-15 14:30" } ] },
            { "anagrafica_serie": { "UnMis": "m³/s" },
              "data_serie": [ { "val": 180.5, "data": "2024-03-15 14:30" } ] },
            { "anagrafica_serie": { "UnMis": "%" },
              "data_serie": [ { "val": 61.3, "data": "2024-03-15 14:30" } ] }
          ]
        },
        {
          "tooltip_config": {
            "titolo": "Lago di Como",
            "series": [
              { "id": 6, "nome": "Riempimento" },
              { "id": 9, "nome": "Temperatura" },
              { "id": 5, "nome": "Deflusso" },
              { "id": 4, "nome": "Afflusso" },
              { "id": 3, "nome": "Livello" }
            ]
          },
          "tooltip_data": [
            { "anagrafica_serie": { "UnMis": "%" },
              "data_serie": [ { "val": 38.0, "data": "2024-03-15 13:00" } ] },
            { "anagrafica_serie": { "UnMis": "°C" },
              "data_serie": [ { "val": 8.4, "data": "2024-03-15 13:00" } ] },
            { "anagrafica_serie": { "UnMis": "m³/s" },
              "data_serie": [ { "val": 95.0, "data": "2024-03-15 13:00" } ] },
            { "anagrafica_serie": { "UnMis": "m³/s" },
              "data_serie": [ { "val": 110.2, "data": "2024-03-15 13:00" } ] },
            { "anagrafica_serie": { "UnMis": "cm" },
              "data_serie": [ { "val": 41.0, "data": "2024-03-15 13:00" } ] }
          ]
        }
      ]
    }"#
}

/// Second lake declares four series but only ships data for two of them.
#[cfg(test)]
pub(crate) fn fixture_short_tooltip_data_json() -> &'static str {
    r#"{
      "success": true,
      "data": [
        {
          "tooltip_config": { "titolo": "Lago d'Iseo", "series": [ { "id": 3 }, { "id": 6 } ] },
          "tooltip_data": [
            { "anagrafica_serie": { "UnMis": "m" }, "data_serie": [ { "val": 185.9, "data": "2024-03-15 12:00" } ] },
            { "anagrafica_serie": { "UnMis": "%" }, "data_serie": [ { "val": 55, "data": "2024-03-15 12:00" } ] }
          ]
        },
        {
          "tooltip_config": { "titolo": "Lago d'Idro", "series": [ { "id": 3 }, { "id": 4 }, { "id": 5 }, { "id": 6 } ] },
          "tooltip_data": [
            { "anagrafica_serie": { "UnMis": "m" }, "data_serie": [ { "val": 367.1, "data": "2024-03-15 12:00" } ] },
            { "anagrafica_serie": { "UnMis": "m³/s" }, "data_serie": [ { "val": 14.0, "data": "2024-03-15 12:00" } ] }
          ]
        }
      ]
    }"#
}

/// Lakes that are broken in various ways around one healthy lake.
#[cfg(test)]
pub(crate) fn fixture_malformed_lakes_json() -> &'static str {
    r#"{
      "success": true,
      "data": [
        { "tooltip_data": [] },
        "not an object",
        {
          "tooltip_config": { "titolo": "Lago di Garda", "series": [ { "id": 3 } ] },
          "tooltip_data": [
            { "anagrafica_serie": { "UnMis": "m" }, "data_serie": [ { "val": "65.40", "data": "2024-03-15 12:00" } ] }
          ]
        },
        {
          "tooltip_config": { "titolo": "Lago di Como", "series": [ { "id": 3 }, { "id": 6 }, { "id": 4 } ] },
          "tooltip_data": [
            { "anagrafica_serie": {}, "data_serie": [] },
            { "anagrafica_serie": { "UnMis": "%" }, "data_serie": [ { "val": 40, "data": "15/03/2024" } ] },
            { "data_serie": [ { "val": 99 } ] }
          ]
        }
      ]
    }"#
}

#[cfg(test)]
pub(crate) fn fixture_upstream_failure_json() -> &'static str {
    r#"{ "success": false, "message": "Configurazione non trovata" }"#
}

/// What laghi.net serves when the session was not established first.
#[cfg(test)]
pub(crate) fn fixture_html_error_page() -> &'static str {
    "<!DOCTYPE html><html><head><title>Errore</title></head><body>Sessione scaduta</body></html>"
}
