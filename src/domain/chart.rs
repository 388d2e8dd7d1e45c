//! Chart figures in the shape Plotly's `newPlot` accepts: `{ data, layout }`.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Figure {
    pub data: Vec<Trace>,
    pub layout: Layout,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Trace {
    Pie {
        labels: Vec<String>,
        values: Vec<usize>,
    },
    Scatter {
        x: Vec<String>,
        y: Vec<usize>,
        mode: &'static str,
    },
    Heatmap {
        x: Vec<String>,
        y: Vec<String>,
        z: Vec<Vec<usize>>,
        texttemplate: &'static str,
    },
    Bar {
        x: Vec<String>,
        y: Vec<usize>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    pub title: Title,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xaxis: Option<Axis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yaxis: Option<Axis>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Title {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Axis {
    pub title: Title,
}

impl Layout {
    pub fn titled(text: impl Into<String>) -> Self {
        Self {
            title: Title { text: text.into() },
            xaxis: None,
            yaxis: None,
        }
    }

    pub fn with_axes(mut self, x_title: &str, y_title: &str) -> Self {
        self.xaxis = Some(Axis::titled(x_title));
        self.yaxis = Some(Axis::titled(y_title));
        self
    }
}

impl Axis {
    pub fn titled(text: &str) -> Self {
        Self {
            title: Title {
                text: text.to_string(),
            },
        }
    }
}

impl Figure {
    #[cfg(test)]
    pub fn title(&self) -> &str {
        &self.layout.title.text
    }
}
