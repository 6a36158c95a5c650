use crate::color::{ColorError, ColorMap};
use crate::config::Config;
use crate::label::TextMeasure;
use crate::legend::Legend;
use crate::model::Hierarchy;
use crate::treemap::{compute_layout, sort_by_value, Layout};
use crate::view::TreemapView;

/// Everything one draw produces from a loaded dataset.
#[derive(Debug, Clone)]
pub struct Visualization {
    pub hierarchy: Hierarchy,
    pub categories: Vec<String>,
    pub colors: ColorMap,
    pub layout: Layout,
    pub treemap: TreemapView,
    pub legend: Legend,
}

impl Visualization {
    /// Categories are taken before sorting so colors follow the dataset's order.
    pub fn draw(mut hierarchy: Hierarchy, config: &Config, measure: &dyn TextMeasure) -> Result<Self, ColorError> {
        let categories = hierarchy.categories();
        let colors = ColorMap::new(&categories, &config.palette)?;
        sort_by_value(&mut hierarchy);
        let layout = compute_layout(&hierarchy, &config.layout);
        let treemap = TreemapView::build(
            &hierarchy,
            &layout,
            &colors,
            (config.layout.width, config.layout.height),
            &config.tiles,
            config.tooltip,
            measure,
        );
        let legend = Legend::build(&colors, &config.legend);
        tracing::info!(
            categories = categories.len(),
            tiles = treemap.tiles.len(),
            rejected = hierarchy.rejected.len(),
            "drew treemap"
        );
        Ok(Self { hierarchy, categories, colors, layout, treemap, legend })
    }
}
