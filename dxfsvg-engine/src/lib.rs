pub mod annotate;
pub mod bounds;
pub mod dimensions;
pub mod geometry;
pub mod inspect;
pub mod layers;
mod number;
pub mod pipeline;
pub mod text;

pub mod errors {
    use thiserror::Error;

    #[derive(Debug, Error)]
    pub enum EngineError {
        #[error("default extent must be a positive finite number, got {0}")]
        InvalidExtent(f64),
        #[error("stroke width must be a positive finite number, got {0}")]
        InvalidStrokeWidth(f64),
        #[error("stroke colour must not be empty")]
        EmptyStroke,
    }
}

pub use annotate::{
    Annotation, AnnotationMatcher, AnnotationPolicy, FirstEntryMatcher, NearestAnchorMatcher,
    SvgStyle,
};
pub use bounds::{BoundsMode, DEFAULT_EXTENT, Viewport, compute_viewport};
pub use dimensions::{DimensionMap, DimensionValue, extract_dimensions};
pub use errors::EngineError;
pub use geometry::{ArcFlagMode, VectorGroup, convert_entities};
pub use inspect::{DimensionReport, LayerCount, inspect_dimensions, layer_inventory};
pub use layers::{LayerSelection, document_entities, select_entities};
pub use pipeline::{Conversion, ConversionOptions, convert};
pub use text::normalize_text;
