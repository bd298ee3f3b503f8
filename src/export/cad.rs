//! DXF rendering through the `dxf` crate.
//!
//! One layer table entry carries the name and color; every segment becomes a
//! `LINE` entity on that layer carrying the color and line weight itself. The
//! header is pinned to R2000, the first version that stores line weights.
use super::style::LayerStyle;
use crate::error::ExportError;
use dxf::entities::{Entity, EntityType, Line};
use dxf::enums::AcadVersion;
use dxf::tables::Layer;
use dxf::{Color, Drawing, Point};
use std::io::Cursor;

/// Line entity as read back from a DXF document.
#[derive(Clone, Debug, PartialEq)]
pub struct DxfLine {
    pub layer: String,
    pub p0: [f64; 2],
    pub p1: [f64; 2],
    /// Line weight in 1/100 mm as stored on the entity.
    pub line_weight: i16,
}

fn dxf_error(err: dxf::DxfError) -> ExportError {
    ExportError::Dxf(err.to_string())
}

/// Render lines given in output coordinates into DXF bytes.
pub fn render_dxf(lines: &[([f64; 2], [f64; 2])], style: &LayerStyle) -> Result<Vec<u8>, ExportError> {
    let mut drawing = Drawing::new();
    drawing.header.version = AcadVersion::R2000;
    drawing.header.current_layer = style.layer_name.clone();

    drawing.add_layer(Layer {
        name: style.layer_name.clone(),
        color: Color::from_index(style.color),
        ..Default::default()
    });

    for (p0, p1) in lines {
        let mut entity = Entity::new(EntityType::Line(Line::new(
            Point::new(p0[0], p0[1], 0.0),
            Point::new(p1[0], p1[1], 0.0),
        )));
        entity.common.layer = style.layer_name.clone();
        entity.common.color = Color::from_index(style.color);
        entity.common.lineweight_enum_value = style.line_weight;
        drawing.add_entity(entity);
    }

    let mut buf = Vec::new();
    drawing.save(&mut buf).map_err(dxf_error)?;
    Ok(buf)
}

/// Parse DXF bytes and return every `LINE` entity.
pub fn read_dxf_lines(bytes: &[u8]) -> Result<Vec<DxfLine>, ExportError> {
    let drawing = Drawing::load(&mut Cursor::new(bytes)).map_err(dxf_error)?;
    Ok(drawing
        .entities()
        .filter_map(|e| match &e.specific {
            EntityType::Line(l) => Some(DxfLine {
                layer: e.common.layer.clone(),
                p0: [l.p1.x, l.p1.y],
                p1: [l.p2.x, l.p2.y],
                line_weight: e.common.lineweight_enum_value,
            }),
            _ => None,
        })
        .collect())
}

/// Names of the layers declared in the document's layer table.
pub fn read_dxf_layers(bytes: &[u8]) -> Result<Vec<String>, ExportError> {
    let drawing = Drawing::load(&mut Cursor::new(bytes)).map_err(dxf_error)?;
    Ok(drawing.layers().map(|l| l.name.clone()).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lines_survive_a_write_read_cycle() {
        let lines = vec![
            ([0.0, 0.0], [100.0, 0.0]),
            ([12.5, -3.25], [40.125, 77.0]),
        ];
        let style = LayerStyle {
            layer_name: "WALLS".into(),
            color: 3,
            line_weight: 50,
        };
        let bytes = render_dxf(&lines, &style).unwrap();
        let back = read_dxf_lines(&bytes).unwrap();
        assert_eq!(back.len(), 2);
        for (read, (p0, p1)) in back.iter().zip(&lines) {
            assert_eq!(read.layer, "WALLS");
            assert_eq!(read.line_weight, 50);
            for i in 0..2 {
                assert!((read.p0[i] - p0[i]).abs() < 1e-6);
                assert!((read.p1[i] - p1[i]).abs() < 1e-6);
            }
        }
        assert!(read_dxf_layers(&bytes).unwrap().contains(&"WALLS".to_string()));
    }

    #[test]
    fn empty_document_is_still_valid_dxf() {
        let bytes = render_dxf(&[], &LayerStyle::default()).unwrap();
        assert!(!bytes.is_empty());
        assert!(read_dxf_lines(&bytes).unwrap().is_empty());
    }

    #[test]
    fn garbage_is_a_dxf_error() {
        let err = read_dxf_lines(b"not a drawing at all").unwrap_err();
        assert!(matches!(err, ExportError::Dxf(_)));
    }
}
