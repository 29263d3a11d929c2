use serde::{Deserialize, Serialize};

/// `output/index.json`: which charts belong to which slide.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexManifest {
    pub slides: Vec<SlideEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlideEntry {
    pub slide: u32,
    pub charts: Vec<ChartRef>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartRef {
    pub name: String,
}

impl IndexManifest {
    /// Ordered chart names for a slide; empty when the slide is not listed.
    pub fn charts_for(&self, slide: u32) -> Vec<String> {
        self.slides
            .iter()
            .find(|entry| entry.slide == slide)
            .map(|entry| entry.charts.iter().map(|c| c.name.clone()).collect())
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }
}
