//! Single-page dashboard served at `/`. Charts are drawn client-side with
//! Plotly from the figure JSON returned by the API.

pub const INDEX_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Moon Missions Dashboard</title>
<script src="https://cdn.plot.ly/plotly-2.27.0.min.js"></script>
<style>
  body { font-family: sans-serif; margin: 0 2rem 2rem; color: #222; }
  h1 { text-align: center; }
  .controls { display: flex; flex-wrap: wrap; gap: 2rem; align-items: center; margin: 1rem 0; }
  .row { display: flex; flex-wrap: wrap; }
  .row > div { flex: 1 1 30rem; min-height: 420px; }
  .error { color: #b00020; font-weight: bold; }
  table { border-collapse: collapse; width: 100%; font-size: 0.9rem; }
  th, td { border: 1px solid #ccc; padding: 4px 6px; text-align: left; }
  th { background: #f2f2f2; cursor: pointer; user-select: none; }
  th input { width: 95%; font-size: 0.8rem; }
  .pager { margin: 0.5rem 0; }
</style>
</head>
<body>
<h1>Moon Missions</h1>

<div class="controls">
  <label>Country <select id="country"></select></label>
  <label>From <input id="start" type="range"> <span id="start-label"></span></label>
  <label>To <input id="end" type="range"> <span id="end-label"></span></label>
</div>
<div id="chart-error" class="error"></div>
<div class="row">
  <div id="pie"></div>
  <div id="scatter"></div>
</div>
<div id="heatmap"></div>

<h2>Failures by country</h2>
<div id="categories" class="controls"></div>
<div id="bar"></div>

<h2>Export</h2>
<div class="controls">
  <select id="format"></select>
  <button id="download">Download</button>
</div>

<h2>Missions</h2>
<div class="pager">
  <button id="prev">&lt;</button>
  <span id="page-label"></span>
  <button id="next">&gt;</button>
</div>
<table id="missions"><thead></thead><tbody></tbody></table>

<script>
const state = { page: 0, pageSize: 10, sortBy: [], filters: {}, totalPages: 0, columns: [] };

async function getJson(url, init) {
  const resp = await fetch(url, init);
  if (!resp.ok) throw new Error(await resp.text());
  return resp.json();
}

function fill(select, values, selected) {
  select.innerHTML = "";
  for (const value of values) {
    const option = document.createElement("option");
    option.value = value;
    option.textContent = value;
    option.selected = value === selected;
    select.appendChild(option);
  }
}

async function renderCharts() {
  const params = new URLSearchParams({
    country: document.getElementById("country").value,
    start: document.getElementById("start").value,
    end: document.getElementById("end").value,
  });
  document.getElementById("start-label").textContent = params.get("start");
  document.getElementById("end-label").textContent = params.get("end");

  const body = await getJson("/api/charts?" + params);
  const error = document.getElementById("chart-error");
  if (body.status === "error") {
    error.textContent = body.message + " (incident " + body.incident_id + ")";
    for (const id of ["pie", "scatter", "heatmap"]) Plotly.purge(id);
    return;
  }
  error.textContent = "";
  Plotly.react("pie", body.pie.data, body.pie.layout);
  Plotly.react("scatter", body.scatter.data, body.scatter.layout);
  Plotly.react("heatmap", body.heatmap.data, body.heatmap.layout);
}

async function renderFailures(category) {
  const params = new URLSearchParams();
  if (category) params.set("category", category);
  const body = await getJson("/api/failures?" + params);
  Plotly.react("bar", body.figure.data, body.figure.layout);
}

function renderHeader() {
  const head = document.querySelector("#missions thead");
  head.innerHTML = "";
  const titles = document.createElement("tr");
  const filters = document.createElement("tr");
  for (const column of state.columns) {
    const th = document.createElement("th");
    const sort = state.sortBy.find(s => s.column === column);
    th.textContent = column + (sort ? (sort.direction === "asc" ? " ▲" : " ▼") : "");
    th.addEventListener("click", event => toggleSort(column, event.shiftKey));
    titles.appendChild(th);

    const cell = document.createElement("th");
    const input = document.createElement("input");
    input.value = state.filters[column] || "";
    input.placeholder = "filter data...";
    input.addEventListener("change", () => {
      state.filters[column] = input.value;
      state.page = 0;
      renderTable();
    });
    cell.appendChild(input);
    filters.appendChild(cell);
  }
  head.appendChild(titles);
  head.appendChild(filters);
}

function toggleSort(column, multi) {
  const existing = state.sortBy.find(s => s.column === column);
  if (!multi) state.sortBy = state.sortBy.filter(s => s.column === column);
  if (!existing) {
    state.sortBy.push({ column, direction: "asc" });
  } else if (existing.direction === "asc") {
    existing.direction = "desc";
  } else {
    state.sortBy = state.sortBy.filter(s => s.column !== column);
  }
  renderTable();
}

async function renderTable() {
  const request = {
    page: state.page,
    page_size: state.pageSize,
    sort_by: state.sortBy,
    filters: Object.entries(state.filters)
      .filter(([, expression]) => expression.trim() !== "")
      .map(([column, expression]) => ({ column, expression })),
  };
  const body = await getJson("/api/table", {
    method: "POST",
    headers: { "Content-Type": "application/json" },
    body: JSON.stringify(request),
  });
  state.totalPages = body.total_pages;
  renderHeader();

  const tbody = document.querySelector("#missions tbody");
  tbody.innerHTML = "";
  for (const row of body.rows) {
    const tr = document.createElement("tr");
    for (const value of row) {
      const td = document.createElement("td");
      td.textContent = value;
      tr.appendChild(td);
    }
    tbody.appendChild(tr);
  }
  document.getElementById("page-label").textContent =
    (body.total_pages === 0 ? 0 : body.page + 1) + " / " + body.total_pages;
}

async function init() {
  const options = await getJson("/api/options");
  state.columns = options.table_columns;
  state.pageSize = options.page_size;

  const country = document.getElementById("country");
  fill(country, options.countries, options.countries[0]);
  for (const id of ["start", "end"]) {
    const slider = document.getElementById(id);
    slider.min = options.years.start;
    slider.max = options.years.end;
    slider.step = 1;
    slider.value = id === "start" ? options.years.start : options.years.end;
    slider.addEventListener("input", renderCharts);
  }
  country.addEventListener("change", renderCharts);

  const categories = document.getElementById("categories");
  for (const category of options.failure_categories) {
    const label = document.createElement("label");
    const radio = document.createElement("input");
    radio.type = "radio";
    radio.name = "category";
    radio.value = category;
    radio.checked = category === options.default_failure_category;
    radio.addEventListener("change", () => renderFailures(category));
    label.appendChild(radio);
    label.appendChild(document.createTextNode(" " + category));
    categories.appendChild(label);
  }

  fill(document.getElementById("format"), options.export_formats, options.export_formats[0]);
  document.getElementById("download").addEventListener("click", () => {
    const format = document.getElementById("format").value;
    window.location = "/api/export?format=" + encodeURIComponent(format);
  });

  document.getElementById("prev").addEventListener("click", () => {
    if (state.page > 0) { state.page -= 1; renderTable(); }
  });
  document.getElementById("next").addEventListener("click", () => {
    if (state.page + 1 < state.totalPages) { state.page += 1; renderTable(); }
  });

  await Promise.all([
    renderCharts(),
    renderFailures(options.default_failure_category),
    renderTable(),
  ]);
}

init().catch(err => {
  document.getElementById("chart-error").textContent = err.message;
});
</script>
</body>
</html>
"##;
