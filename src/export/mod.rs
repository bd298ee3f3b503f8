//! GeometryExporter: snapped segments → CAD and GeoJSON documents.
//!
//! Both documents are rendered from the same list of output-space endpoints
//! (pixel coordinates, or `transform(pixel)` when a [`PixelToWorld`] is
//! given), so the two files always describe identical geometry. Rendering
//! happens completely in memory before anything reaches a sink, and the
//! documents are published as a pair: either both land or neither does.
//! Without a transform, coordinates are raw pixels with y pointing down.

pub mod cad;
pub mod geojson;
mod sink;
mod style;

pub use cad::{read_dxf_layers, read_dxf_lines, render_dxf, DxfLine};
pub use geojson::{Feature, FeatureCollection, Geometry, LineProperties};
pub use sink::{DocumentSink, FileSink, MemorySink};
pub use style::{LayerStyle, LINE_WEIGHT_SENTINELS};

use crate::error::ExportError;
use crate::snapping::SnappedSegment;
use crate::transform::PixelToWorld;
use log::{debug, warn};
use serde::Serialize;

/// What an export wrote.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportReport {
    pub lines_written: usize,
    pub cad_bytes: usize,
    pub geographic_bytes: Option<usize>,
}

#[derive(Clone, Debug)]
pub struct GeometryExporter {
    style: LayerStyle,
}

impl GeometryExporter {
    pub fn new(style: LayerStyle) -> Self {
        Self { style }
    }

    pub fn style(&self) -> &LayerStyle {
        &self.style
    }

    /// Endpoints in output coordinates.
    pub fn output_endpoints(
        segments: &[SnappedSegment],
        transform: Option<&PixelToWorld>,
    ) -> Vec<([f64; 2], [f64; 2])> {
        segments
            .iter()
            .map(|s| match transform {
                Some(t) => (t.apply(s.p0), t.apply(s.p1)),
                None => (s.p0, s.p1),
            })
            .collect()
    }

    pub fn render_cad(
        &self,
        segments: &[SnappedSegment],
        transform: Option<&PixelToWorld>,
    ) -> Result<Vec<u8>, ExportError> {
        render_dxf(&Self::output_endpoints(segments, transform), &self.style)
    }

    pub fn feature_collection(
        &self,
        segments: &[SnappedSegment],
        transform: Option<&PixelToWorld>,
    ) -> FeatureCollection {
        let lines = Self::output_endpoints(segments, transform);
        let features = segments
            .iter()
            .zip(lines)
            .map(|(seg, (p0, p1))| {
                let length = ((p1[0] - p0[0]).powi(2) + (p1[1] - p0[1]).powi(2)).sqrt();
                Feature::line(
                    p0,
                    p1,
                    LineProperties {
                        layer: self.style.layer_name.clone(),
                        angle_deg: seg.angle_deg,
                        length,
                        sources: seg.sources.clone(),
                    },
                )
            })
            .collect();
        FeatureCollection::new(features)
    }

    /// Render both documents, stage them, then publish them. Nothing is
    /// published unless both documents were rendered and staged, and a
    /// failure while publishing rolls back whatever was already published.
    pub fn export(
        &self,
        segments: &[SnappedSegment],
        transform: Option<&PixelToWorld>,
        cad: &mut dyn DocumentSink,
        mut geographic: Option<&mut dyn DocumentSink>,
    ) -> Result<ExportReport, ExportError> {
        let cad_doc = self.render_cad(segments, transform)?;
        let geo_doc = if geographic.is_some() {
            let fc = self.feature_collection(segments, transform);
            Some(geojson::render_geojson(&fc)?)
        } else {
            None
        };

        let staged = cad.stage(&cad_doc).and_then(|()| {
            match (geographic.as_deref_mut(), geo_doc.as_deref()) {
                (Some(sink), Some(doc)) => sink.stage(doc),
                _ => Ok(()),
            }
        });
        let published = staged
            .and_then(|()| cad.finalize())
            .and_then(|()| match geographic.as_deref_mut() {
                Some(sink) => sink.finalize(),
                None => Ok(()),
            });
        if let Err(err) = published {
            if let Some(sink) = geographic.as_deref_mut() {
                undo(sink);
            }
            undo(cad);
            return Err(err);
        }
        cad.release();
        if let Some(sink) = geographic.as_deref_mut() {
            sink.release();
        }

        debug!(
            "GeometryExporter: {} lines, {} bytes -> {}",
            segments.len(),
            cad_doc.len(),
            cad.describe()
        );
        if let (Some(sink), Some(doc)) = (geographic.as_deref(), geo_doc.as_ref()) {
            debug!("GeometryExporter: GeoJSON {} bytes -> {}", doc.len(), sink.describe());
        }

        Ok(ExportReport {
            lines_written: segments.len(),
            cad_bytes: cad_doc.len(),
            geographic_bytes: geo_doc.map(|doc| doc.len()),
        })
    }
}

fn undo(sink: &mut dyn DocumentSink) {
    if let Err(err) = sink.rollback() {
        warn!("GeometryExporter: rollback of {} failed: {}", sink.describe(), err);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segments::SegmentId;

    fn seg(p0: [f64; 2], p1: [f64; 2], angle: f64, id: u32) -> SnappedSegment {
        SnappedSegment {
            p0,
            p1,
            angle_deg: angle,
            grid_index: 0,
            sources: vec![SegmentId(id)],
        }
    }

    fn sample() -> Vec<SnappedSegment> {
        vec![
            seg([10.0, 20.0], [110.0, 20.0], 0.0, 0),
            seg([50.0, 0.0], [50.0, 75.0], 90.0, 1),
            seg([0.0, 0.0], [30.0, 30.0], 45.0, 2),
        ]
    }

    #[test]
    fn cad_round_trip_matches_segments() {
        let exporter = GeometryExporter::new(LayerStyle::default());
        let mut cad = MemorySink::new();
        let report = exporter.export(&sample(), None, &mut cad, None).unwrap();
        assert_eq!(report.lines_written, 3);
        assert_eq!(report.geographic_bytes, None);

        let lines = read_dxf_lines(&cad.contents().unwrap()).unwrap();
        assert_eq!(lines.len(), 3);
        for (line, s) in lines.iter().zip(sample()) {
            assert_eq!(line.layer, "LINES");
            assert_eq!(line.line_weight, LayerStyle::default().line_weight);
            for i in 0..2 {
                assert!((line.p0[i] - s.p0[i]).abs() < 1e-6);
                assert!((line.p1[i] - s.p1[i]).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn geographic_output_is_transformed_cad_geometry() {
        let t = PixelToWorld::from_geotransform([1000.0, 0.25, 0.0, 2000.0, 0.0, -0.25]).unwrap();
        let exporter = GeometryExporter::new(LayerStyle::default());
        let mut cad = MemorySink::new();
        let mut geo = MemorySink::new();
        exporter
            .export(&sample(), Some(&t), &mut cad, Some(&mut geo))
            .unwrap();

        let cad_lines = read_dxf_lines(&cad.contents().unwrap()).unwrap();
        let fc = FeatureCollection::parse(&geo.contents().unwrap()).unwrap();
        assert_eq!(fc.features.len(), cad_lines.len());
        for ((feature, line), s) in fc.features.iter().zip(&cad_lines).zip(sample()) {
            let (g0, g1) = feature.endpoints().unwrap();
            let (w0, w1) = (t.apply(s.p0), t.apply(s.p1));
            for i in 0..2 {
                assert!((g0[i] - w0[i]).abs() < 1e-9);
                assert!((g1[i] - w1[i]).abs() < 1e-9);
                assert!((line.p0[i] - g0[i]).abs() < 1e-6);
                assert!((line.p1[i] - g1[i]).abs() < 1e-6);
            }
        }
        assert_eq!(fc.features[1].properties.angle_deg, 90.0);
        assert!((fc.features[0].properties.length - 25.0).abs() < 1e-9);
    }

    #[test]
    fn empty_segment_list_writes_empty_documents() {
        let exporter = GeometryExporter::new(LayerStyle::default());
        let mut cad = MemorySink::new();
        let mut geo = MemorySink::new();
        exporter.export(&[], None, &mut cad, Some(&mut geo)).unwrap();
        assert!(read_dxf_lines(&cad.contents().unwrap()).unwrap().is_empty());
        let fc = FeatureCollection::parse(&geo.contents().unwrap()).unwrap();
        assert_eq!(fc.kind, "FeatureCollection");
        assert!(fc.features.is_empty());
    }

    /// Stages fine, refuses to publish.
    struct Unpublishable;

    impl DocumentSink for Unpublishable {
        fn stage(&mut self, _bytes: &[u8]) -> Result<(), ExportError> {
            Ok(())
        }

        fn finalize(&mut self) -> Result<(), ExportError> {
            Err(ExportError::Io(std::io::Error::other("read-only destination")))
        }

        fn rollback(&mut self) -> Result<(), ExportError> {
            Ok(())
        }

        fn describe(&self) -> String {
            "<read-only>".to_string()
        }
    }

    #[test]
    fn failed_geographic_publish_restores_cad_document() {
        let exporter = GeometryExporter::new(LayerStyle::default());
        let handle = MemorySink::new();
        let mut cad = handle.clone();
        exporter.export(&[], None, &mut cad, None).unwrap();
        let before = handle.contents().unwrap();

        let err = exporter
            .export(&sample(), None, &mut cad, Some(&mut Unpublishable))
            .unwrap_err();
        assert!(matches!(err, ExportError::Io(_)));
        assert_eq!(handle.contents().unwrap(), before);
        assert!(read_dxf_lines(&before).unwrap().is_empty());
    }

    #[test]
    fn failed_geographic_stage_publishes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let cad_path = dir.path().join("walls.dxf");
        let mut cad = FileSink::new(&cad_path);
        // a directory cannot be replaced by a document
        let mut geo = FileSink::new(dir.path());
        let err = GeometryExporter::new(LayerStyle::default())
            .export(&sample(), None, &mut cad, Some(&mut geo))
            .unwrap_err();
        assert!(matches!(err, ExportError::Persist { .. }));
        assert!(!cad_path.exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
