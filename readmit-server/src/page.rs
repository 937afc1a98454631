//! The single-page prediction form.
//!
//! Served at `GET /`. All interactivity is a small inline script that posts
//! the patient row to `/predict` and renders the returned assessment. Control
//! ids match the canonical feature column names, in column order.

/// Render the form page for the loaded model backend.
pub fn render_page(model_name: &str) -> String {
    PAGE_TEMPLATE.replace("{model_name}", model_name)
}

const PAGE_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Readmission Risk Prediction</title>
<style>
  body {
    font-family: "Segoe UI", -apple-system, Helvetica, Arial, sans-serif;
    background: #f7f8fa;
    color: #1f2430;
    margin: 0;
  }
  main {
    max-width: 640px;
    margin: 2.5rem auto;
    padding: 0 1.25rem 3rem;
  }
  h1 { font-size: 1.75rem; margin-bottom: 0.25rem; }
  h3 { margin: 1.5rem 0 0.5rem; }
  .banner {
    border-radius: 6px;
    padding: 0.75rem 1rem;
    margin: 0.75rem 0;
  }
  .banner.success { background: #e6f4ea; color: #1e6b33; }
  .banner.info    { background: #e8f0fe; color: #1a4f8b; }
  .banner.warning { background: #fdf0e2; color: #9a5b13; }
  .banner.error   { background: #fdecea; color: #a32020; }
  .field { margin: 1.1rem 0; }
  .field label { display: block; font-weight: 600; margin-bottom: 0.35rem; }
  .field input[type="number"] {
    width: 10rem;
    padding: 0.4rem 0.5rem;
    border: 1px solid #c8ccd4;
    border-radius: 4px;
  }
  .field input[type="range"] { width: 100%; }
  .checkbox label { display: inline; font-weight: 600; margin-left: 0.4rem; }
  #predict {
    background: #d93b3b;
    color: #fff;
    border: none;
    border-radius: 6px;
    padding: 0.6rem 1.4rem;
    font-size: 1rem;
    cursor: pointer;
  }
  #predict:disabled { background: #c8ccd4; cursor: wait; }
  #result { display: none; }
  footer { margin-top: 3rem; color: #8a8f99; font-size: 0.8rem; }
</style>
</head>
<body>
<main>
  <h1>Readmission Risk Prediction</h1>
  <p>Enter patient details to predict their readmission risk.</p>
  <div class="banner success">Model loaded successfully!</div>

  <div class="field">
    <label for="age">Age: <span id="age-value">50</span></label>
    <input type="range" id="age" min="18" max="100" value="50">
  </div>

  <div class="field checkbox">
    <input type="checkbox" id="has_diabetes">
    <label for="has_diabetes">Has Diabetes</label>
  </div>

  <div class="field checkbox">
    <input type="checkbox" id="has_hypertension">
    <label for="has_hypertension">Has Hypertension</label>
  </div>

  <div class="field">
    <label for="previous_admissions">Number of Previous Admissions</label>
    <input type="number" id="previous_admissions" min="0" step="1" value="0">
  </div>

  <div class="field">
    <label for="avg_blood_sugar_last_7_days">Average Blood Sugar (last 7 days, e.g., mmol/L)</label>
    <input type="number" id="avg_blood_sugar_last_7_days" min="0" step="0.01" value="5.0">
  </div>

  <button id="predict">Predict Risk</button>

  <div id="result">
    <h3>Prediction Result:</h3>
    <p id="probability"></p>
    <div id="advisory" class="banner"></div>
  </div>

  <footer>backend: {model_name}</footer>
</main>

<script>
  var fields = [
    "age",
    "has_diabetes",
    "has_hypertension",
    "previous_admissions",
    "avg_blood_sugar_last_7_days"
  ];

  var ageInput = document.getElementById("age");
  ageInput.addEventListener("input", function () {
    document.getElementById("age-value").textContent = ageInput.value;
  });

  // A changed input invalidates the previous result.
  fields.forEach(function (id) {
    var el = document.getElementById(id);
    el.addEventListener("input", clearResult);
    el.addEventListener("change", clearResult);
  });

  function clearResult() {
    document.getElementById("result").style.display = "none";
  }

  function showError(message) {
    var advisory = document.getElementById("advisory");
    document.getElementById("probability").textContent = "";
    advisory.textContent = message;
    advisory.className = "banner error";
    document.getElementById("result").style.display = "block";
  }

  function showResult(data) {
    var advisory = document.getElementById("advisory");
    document.getElementById("probability").innerHTML =
      "The predicted readmission risk is: <strong>" + data.formatted + "</strong>";
    advisory.textContent = data.advisory;
    advisory.className = "banner " + data.banner;
    document.getElementById("result").style.display = "block";
  }

  document.getElementById("predict").addEventListener("click", async function () {
    var button = document.getElementById("predict");
    var body = {
      age: Number(document.getElementById("age").value),
      has_diabetes: document.getElementById("has_diabetes").checked,
      has_hypertension: document.getElementById("has_hypertension").checked,
      previous_admissions: Number(document.getElementById("previous_admissions").value),
      avg_blood_sugar_last_7_days: Number(
        document.getElementById("avg_blood_sugar_last_7_days").value
      )
    };

    button.disabled = true;
    button.textContent = "Predicting...";
    try {
      var resp = await fetch("/predict", {
        method: "POST",
        headers: { "Content-Type": "application/json" },
        body: JSON.stringify(body)
      });
      if (!resp.ok) {
        var message = "Prediction failed (HTTP " + resp.status + ")";
        try {
          var err = await resp.json();
          if (err.error) { message = err.error; }
        } catch (ignored) {}
        showError(message);
        return;
      }
      showResult(await resp.json());
    } catch (e) {
      showError("Could not reach the prediction server.");
    } finally {
      button.disabled = false;
      button.textContent = "Predict Risk";
    }
  });
</script>
</body>
</html>
"##;

// ============================================================================
// TESTS
// ============================================================================
