use crate::application::use_cases::aggregation::{
    CountryFailureCount, HeatmapMatrix, LaunchCount, OutcomeCount,
};
use crate::application::use_cases::input_validator::CountrySelection;
use crate::domain::chart::{Figure, Layout, Trace};

pub const HEATMAP_TITLE: &str = "Mission Type vs. Mission Outcome";
pub const FAILURE_BAR_TITLE: &str = "Number of fails";

pub fn outcome_pie_title(country: CountrySelection<'_>) -> String {
    match country {
        CountrySelection::All => "Total Mission Outcomes".to_string(),
        CountrySelection::Country(name) => format!("Mission outcomes for {}", name),
    }
}

pub fn launch_scatter_title(country: CountrySelection<'_>) -> String {
    match country {
        CountrySelection::All => "Launch Date vs. Number of Launches in Total".to_string(),
        CountrySelection::Country(name) => {
            format!("Launch Date vs. Number of Launches for {}", name)
        }
    }
}

pub fn outcome_pie(title: String, counts: &[OutcomeCount]) -> Figure {
    Figure {
        data: vec![Trace::Pie {
            labels: counts.iter().map(|c| c.outcome.clone()).collect(),
            values: counts.iter().map(|c| c.count).collect(),
        }],
        layout: Layout::titled(title),
    }
}

pub fn launch_scatter(title: String, counts: &[LaunchCount]) -> Figure {
    Figure {
        data: vec![Trace::Scatter {
            x: counts
                .iter()
                .map(|c| c.date.format("%Y-%m-%d").to_string())
                .collect(),
            y: counts.iter().map(|c| c.count).collect(),
            mode: "markers",
        }],
        layout: Layout::titled(title).with_axes("Years", "Number of Launches"),
    }
}

/// Outcomes on the x axis, mission types on the y axis, counts printed in cells.
pub fn mission_heatmap(matrix: &HeatmapMatrix) -> Figure {
    Figure {
        data: vec![Trace::Heatmap {
            x: matrix.outcomes.clone(),
            y: matrix.mission_types.clone(),
            z: matrix.counts.clone(),
            texttemplate: "%{z}",
        }],
        layout: Layout::titled(HEATMAP_TITLE),
    }
}

pub fn failure_bar(counts: &[CountryFailureCount]) -> Figure {
    Figure {
        data: vec![Trace::Bar {
            x: counts.iter().map(|c| c.country.clone()).collect(),
            y: counts.iter().map(|c| c.count).collect(),
        }],
        layout: Layout::titled(FAILURE_BAR_TITLE).with_axes("", ""),
    }
}
