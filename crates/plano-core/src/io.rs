//! Graph (de)serialization
//!
//! Exports a node tree as a JSON literal of the form `{"type": ...,
//! fields..., "children": [...]}` and revives one back into a live
//! [`Scene`]. Numbers round to 3 decimals; a vector with equal components
//! collapses to a scalar; components and fields at their defaults are
//! omitted. Composite and solid internals are never serialized, the
//! builders regenerate them on import.
//!
//! Import is permissive: unknown node types are skipped with a warning and
//! unrecognized path instructions degrade to lines.

use serde_json::{Map, Value};
use tracing::warn;
use uuid::Uuid;

use crate::error::{SceneError, SceneResult};
use crate::math::{Vector, round3};
use crate::paint::{Backface, Paint};
use crate::path::PathStep;
use crate::scene::{
    CompositeData, CompositeKind, Face, FaceSetting, Form, NodeKind, Placement, Scene, ShapeData,
    SolidExtra, Style,
};
use crate::shapes::{
    EllipseOptions, GroupOptions, PolygonOptions, RectOptions, RoundedRectOptions, ShapeOptions,
};
use crate::solids::{
    BoxOptions, ConeOptions, CylinderOptions, FunnelOptions, HemisphereOptions, HornOptions,
};
use crate::texture::{ColorStop, Gradient, Quad, TextureOptions};

/// Serialize the subtree rooted at `id` to a JSON tree literal.
pub fn export_graph(scene: &Scene, id: Uuid) -> SceneResult<Value> {
    let node = scene.node(id).ok_or(SceneError::NodeNotFound(id))?;
    let mut map = Map::new();
    map.insert("type".into(), Value::String(node.type_name().into()));
    insert_vector(&mut map, "translate", node.translate, Vector::ZERO, 0.0);
    insert_vector(&mut map, "rotate", node.rotate, Vector::ZERO, 0.0);
    insert_vector(&mut map, "scale", node.scale, Vector::ONE, 1.0);
    insert_vector(&mut map, "origin", node.origin, Vector::ZERO, 0.0);

    let skip_children = match &node.kind {
        NodeKind::Anchor => false,
        NodeKind::Group(group) => {
            export_bool(&mut map, "updateSort", group.update_sort, false);
            export_bool(&mut map, "visible", group.visible, true);
            false
        }
        NodeKind::Shape(shape) => {
            export_shape_fields(scene, node.type_name(), shape, &mut map)?;
            // solid shapes own their apex anchor; the builder recreates it
            shape.solid != SolidExtra::None
        }
        NodeKind::Composite(composite) => {
            export_composite_fields(scene, composite, &mut map)?;
            true
        }
    };

    if !skip_children {
        let mut children = Vec::new();
        for child in scene.children_of(id) {
            children.push(export_graph(scene, *child)?);
        }
        if !children.is_empty() {
            map.insert("children".into(), Value::Array(children));
        }
    }
    Ok(Value::Object(map))
}

/// Revive a tree literal, attaching it under `parent` (or as a new root).
/// Returns the revived root id, or `None` when the node type is unknown.
pub fn import_graph(
    scene: &mut Scene,
    parent: Option<Uuid>,
    value: &Value,
) -> SceneResult<Option<Uuid>> {
    let obj = value
        .as_object()
        .ok_or_else(|| SceneError::MalformedGraph("node must be a JSON object".into()))?;
    let type_name = obj.get("type").and_then(Value::as_str).unwrap_or("Anchor");
    let place = Placement {
        translate: vector_field(obj, "translate", Vector::ZERO, 0.0),
        rotate: vector_field(obj, "rotate", Vector::ZERO, 0.0),
        scale: vector_field(obj, "scale", Vector::ONE, 1.0),
    };

    let id = match type_name {
        "Anchor" => scene.add_anchor(parent, place)?,
        "Group" => {
            let update_sort = bool_field(obj, "updateSort", false);
            scene.add_group(parent, GroupOptions { place, update_sort })?
        }
        "Shape" => {
            let options = ShapeOptions {
                place,
                path: parse_path(obj)?,
                front: vector_field(obj, "front", Vector::unit_z(), 0.0),
                style: parse_style(scene, obj, "Shape")?,
            };
            scene.add_shape(parent, options)?
        }
        "Rect" => {
            let options = RectOptions {
                place,
                width: f64_field(obj, "width", 1.0),
                height: f64_field(obj, "height", 1.0),
                style: parse_style(scene, obj, "Rect")?,
            };
            scene.add_rect(parent, options)?
        }
        "RoundedRect" => {
            let options = RoundedRectOptions {
                place,
                width: f64_field(obj, "width", 1.0),
                height: f64_field(obj, "height", 1.0),
                corner_radius: f64_field(obj, "cornerRadius", 0.25),
                style: parse_style(scene, obj, "RoundedRect")?,
            };
            scene.add_rounded_rect(parent, options)?
        }
        "Ellipse" => {
            let options = EllipseOptions {
                place,
                diameter: f64_field(obj, "diameter", 1.0),
                width: obj.get("width").and_then(Value::as_f64),
                height: obj.get("height").and_then(Value::as_f64),
                quarters: u32_field(obj, "quarters", 4),
                style: parse_style(scene, obj, "Ellipse")?,
            };
            scene.add_ellipse(parent, options)?
        }
        "Polygon" => {
            let options = PolygonOptions {
                place,
                sides: u32_field(obj, "sides", 3),
                radius: f64_field(obj, "radius", 0.5),
                style: parse_style(scene, obj, "Polygon")?,
            };
            scene.add_polygon(parent, options)?
        }
        "Cone" => {
            let options = ConeOptions {
                place,
                diameter: f64_field(obj, "diameter", 1.0),
                length: f64_field(obj, "length", 1.0),
                style: parse_style(scene, obj, "Cone")?,
            };
            scene.add_cone(parent, options)?
        }
        "Hemisphere" => {
            let options = HemisphereOptions {
                place,
                diameter: f64_field(obj, "diameter", 1.0),
                style: parse_style(scene, obj, "Hemisphere")?,
            };
            scene.add_hemisphere(parent, options)?
        }
        "Cylinder" => {
            let options = CylinderOptions {
                place,
                diameter: f64_field(obj, "diameter", 1.0),
                length: f64_field(obj, "length", 1.0),
                color: paint_field(scene, obj, "color")?.unwrap_or_default(),
                stroke: f64_field(obj, "stroke", 1.0),
                fill: bool_field(obj, "fill", true),
                visible: bool_field(obj, "visible", true),
                front_face: paint_field(scene, obj, "frontFace")?,
                backface: parse_backface(scene, obj)?,
            };
            scene.add_cylinder(parent, options)?.root
        }
        "Horn" => {
            let options = HornOptions {
                place,
                front_diameter: f64_field(obj, "frontDiameter", 1.0),
                rear_diameter: f64_field(obj, "rearDiameter", 1.0),
                length: f64_field(obj, "length", 1.0),
                color: paint_field(scene, obj, "color")?.unwrap_or_default(),
                stroke: f64_field(obj, "stroke", 1.0),
                fill: bool_field(obj, "fill", true),
                visible: bool_field(obj, "visible", true),
                front_face: paint_field(scene, obj, "frontFace")?,
                backface: parse_backface(scene, obj)?,
            };
            scene.add_horn(parent, options)?.root
        }
        "Funnel" => {
            let options = FunnelOptions {
                place,
                front_diameter: f64_field(obj, "frontDiameter", 1.0),
                rear_diameter: f64_field(obj, "rearDiameter", 1.0),
                length: f64_field(obj, "length", 1.0),
                color: paint_field(scene, obj, "color")?.unwrap_or_default(),
                stroke: f64_field(obj, "stroke", 1.0),
                fill: bool_field(obj, "fill", true),
                visible: bool_field(obj, "visible", true),
                front_face: paint_field(scene, obj, "frontFace")?,
                backface: parse_backface(scene, obj)?,
            };
            scene.add_funnel(parent, options)?.root
        }
        "Box" => {
            let options = BoxOptions {
                place,
                width: f64_field(obj, "width", 1.0),
                height: f64_field(obj, "height", 1.0),
                depth: f64_field(obj, "depth", 1.0),
                color: paint_field(scene, obj, "color")?.unwrap_or_default(),
                stroke: f64_field(obj, "stroke", 1.0),
                fill: bool_field(obj, "fill", true),
                visible: bool_field(obj, "visible", true),
                backface: parse_backface(scene, obj)?,
                faces: parse_faces(scene, obj)?,
            };
            scene.add_box(parent, options)?
        }
        other => {
            warn!(node_type = other, "skipping unknown node type");
            return Ok(None);
        }
    };

    let origin = vector_field(obj, "origin", Vector::ZERO, 0.0);
    if origin != Vector::ZERO {
        if let Some(node) = scene.node_mut(id) {
            node.origin = origin;
        }
    }

    if let Some(children) = obj.get("children").and_then(Value::as_array) {
        for child in children {
            import_graph(scene, Some(id), child)?;
        }
    }
    Ok(Some(id))
}

// ----- export helpers ----- //

fn export_shape_fields(
    scene: &Scene,
    type_name: &str,
    shape: &ShapeData,
    map: &mut Map<String, Value>,
) -> SceneResult<()> {
    match &shape.form {
        Form::Path(steps) => {
            map.insert("path".into(), Value::Array(steps.iter().map(step_value).collect()));
            insert_vector(map, "front", shape.front, Vector::unit_z(), 0.0);
        }
        Form::Rect { width, height } => {
            export_number(map, "width", *width, 1.0);
            export_number(map, "height", *height, 1.0);
        }
        Form::RoundedRect { width, height, corner_radius } => {
            export_number(map, "width", *width, 1.0);
            export_number(map, "height", *height, 1.0);
            export_number(map, "cornerRadius", *corner_radius, 0.25);
        }
        Form::Ellipse { diameter, width, height, quarters } => {
            export_number(map, "diameter", *diameter, 1.0);
            if let Some(width) = width {
                map.insert("width".into(), number(*width));
            }
            if let Some(height) = height {
                map.insert("height".into(), number(*height));
            }
            if *quarters != 4 {
                map.insert("quarters".into(), Value::from(*quarters));
            }
        }
        Form::Polygon { sides, radius } => {
            if *sides != 3 {
                map.insert("sides".into(), Value::from(*sides));
            }
            export_number(map, "radius", *radius, 0.5);
        }
    }
    if let SolidExtra::Cone { length, .. } = shape.solid {
        export_number(map, "length", length, 1.0);
    }

    let defaults = default_style(type_name);
    let style = &shape.style;
    if style.color != defaults.color {
        map.insert("color".into(), paint_value(scene, &style.color)?);
    }
    export_number(map, "stroke", style.stroke, defaults.stroke);
    export_bool(map, "fill", style.fill, defaults.fill);
    export_bool(map, "closed", style.closed, defaults.closed);
    export_bool(map, "visible", style.visible, defaults.visible);
    export_backface(scene, map, &style.backface)?;
    Ok(())
}

fn export_composite_fields(
    scene: &Scene,
    composite: &CompositeData,
    map: &mut Map<String, Value>,
) -> SceneResult<()> {
    match &composite.kind {
        CompositeKind::Cylinder { diameter, length, front_face, rear_base, .. } => {
            export_number(map, "diameter", *diameter, 1.0);
            export_number(map, "length", *length, 1.0);
            if let Some(paint) = front_face {
                map.insert("frontFace".into(), paint_value(scene, paint)?);
            }
            export_cap_backface(scene, map, *rear_base)?;
        }
        CompositeKind::Horn { front_diameter, rear_diameter, length, front_face, rear_base, .. }
        | CompositeKind::Funnel {
            front_diameter, rear_diameter, length, front_face, rear_base, ..
        } => {
            export_number(map, "frontDiameter", *front_diameter, 1.0);
            export_number(map, "rearDiameter", *rear_diameter, 1.0);
            export_number(map, "length", *length, 1.0);
            if let Some(paint) = front_face {
                map.insert("frontFace".into(), paint_value(scene, paint)?);
            }
            export_cap_backface(scene, map, *rear_base)?;
        }
        CompositeKind::Box(data) => {
            export_number(map, "width", data.width, 1.0);
            export_number(map, "height", data.height, 1.0);
            export_number(map, "depth", data.depth, 1.0);
            export_backface(scene, map, &data.backface)?;
            for face in Face::ALL {
                match &data.faces[face.index()] {
                    FaceSetting::Visible => {}
                    FaceSetting::Hidden => {
                        map.insert(face.name().into(), Value::Bool(false));
                    }
                    FaceSetting::Painted(paint) => {
                        map.insert(face.name().into(), paint_value(scene, paint)?);
                    }
                }
            }
        }
    }
    if composite.color != Paint::default() {
        map.insert("color".into(), paint_value(scene, &composite.color)?);
    }
    export_number(map, "stroke", composite.stroke, 1.0);
    export_bool(map, "fill", composite.fill, true);
    export_bool(map, "visible", composite.visible, true);
    Ok(())
}

/// Extruded solids keep the shared backface on their caps, not on the root.
fn export_cap_backface(
    scene: &Scene,
    map: &mut Map<String, Value>,
    rear_base: Uuid,
) -> SceneResult<()> {
    let node = scene.node(rear_base).ok_or(SceneError::NodeNotFound(rear_base))?;
    match &node.kind {
        NodeKind::Shape(shape) => export_backface(scene, map, &shape.style.backface),
        _ => Err(SceneError::KindMismatch { id: rear_base, expected: "shape" }),
    }
}

fn export_backface(
    scene: &Scene,
    map: &mut Map<String, Value>,
    backface: &Backface,
) -> SceneResult<()> {
    match backface {
        Backface::Visible => {}
        Backface::Hidden => {
            map.insert("backface".into(), Value::Bool(false));
        }
        Backface::Painted(paint) => {
            map.insert("backface".into(), paint_value(scene, paint)?);
        }
    }
    Ok(())
}

fn paint_value(scene: &Scene, paint: &Paint) -> SceneResult<Value> {
    match paint {
        Paint::Color(value) => Ok(Value::String(value.clone())),
        Paint::Texture(id) => {
            let texture = scene.texture(*id).ok_or(SceneError::TextureNotFound(*id))?;
            let mut map = Map::new();
            map.insert("gradient".into(), to_value(&texture.gradient)?);
            map.insert("colorStops".into(), to_value(&texture.color_stops)?);
            map.insert("src".into(), to_value(&Quad::Points(*texture.src_points()))?);
            map.insert("dst".into(), to_value(&Quad::Points(*texture.dst_points()))?);
            let mut value = Value::Object(map);
            round_value(&mut value);
            Ok(value)
        }
    }
}

fn to_value<T: serde::Serialize>(value: &T) -> SceneResult<Value> {
    serde_json::to_value(value).map_err(|err| SceneError::MalformedGraph(err.to_string()))
}

fn step_value(step: &PathStep) -> Value {
    match step {
        PathStep::Point(point) => point_value(*point),
        PathStep::Move(point) => keyed("move", point_value(*point)),
        PathStep::Line(point) => keyed("line", point_value(*point)),
        PathStep::Bezier(points) => {
            keyed("bezier", Value::Array(points.iter().map(|p| point_value(*p)).collect()))
        }
        PathStep::Arc(points) => {
            keyed("arc", Value::Array(points.iter().map(|p| point_value(*p)).collect()))
        }
    }
}

fn keyed(key: &str, value: Value) -> Value {
    let mut map = Map::new();
    map.insert(key.into(), value);
    Value::Object(map)
}

/// Path points stay in object form; an origin point serializes as `{}`.
fn point_value(point: Vector) -> Value {
    let mut map = Map::new();
    for (key, component) in [("x", point.x), ("y", point.y), ("z", point.z)] {
        if component != 0.0 {
            map.insert(key.into(), number(component));
        }
    }
    Value::Object(map)
}

fn insert_vector(
    map: &mut Map<String, Value>,
    key: &str,
    vector: Vector,
    default: Vector,
    default_component: f64,
) {
    if vector == default {
        return;
    }
    if vector.x == vector.y && vector.y == vector.z {
        map.insert(key.into(), number(vector.x));
        return;
    }
    let mut obj = Map::new();
    for (name, component) in [("x", vector.x), ("y", vector.y), ("z", vector.z)] {
        if component != default_component {
            obj.insert(name.into(), number(component));
        }
    }
    map.insert(key.into(), Value::Object(obj));
}

fn export_number(map: &mut Map<String, Value>, key: &str, value: f64, default: f64) {
    if value != default {
        map.insert(key.into(), number(value));
    }
}

fn export_bool(map: &mut Map<String, Value>, key: &str, value: bool, default: bool) {
    if value != default {
        map.insert(key.into(), Value::Bool(value));
    }
}

fn number(value: f64) -> Value {
    Value::from(round3(value))
}

fn round_value(value: &mut Value) {
    match value {
        Value::Number(n) => {
            if let Some(float) = n.as_f64() {
                *value = Value::from(round3(float));
            }
        }
        Value::Array(items) => items.iter_mut().for_each(round_value),
        Value::Object(map) => map.values_mut().for_each(round_value),
        _ => {}
    }
}

// ----- import helpers ----- //

/// Builder defaults that differ per node type; elision compares against
/// these on export and import starts from them.
fn default_style(type_name: &str) -> Style {
    match type_name {
        "Ellipse" | "RoundedRect" => Style { closed: false, ..Default::default() },
        "Cone" | "Hemisphere" => Style { fill: true, closed: false, ..Default::default() },
        _ => Style::default(),
    }
}

fn parse_style(scene: &mut Scene, obj: &Map<String, Value>, type_name: &str) -> SceneResult<Style> {
    let defaults = default_style(type_name);
    Ok(Style {
        color: paint_field(scene, obj, "color")?.unwrap_or(defaults.color),
        stroke: f64_field(obj, "stroke", defaults.stroke),
        fill: bool_field(obj, "fill", defaults.fill),
        closed: bool_field(obj, "closed", defaults.closed),
        visible: bool_field(obj, "visible", defaults.visible),
        backface: parse_backface(scene, obj)?,
    })
}

fn parse_backface(scene: &mut Scene, obj: &Map<String, Value>) -> SceneResult<Backface> {
    match obj.get("backface") {
        None | Some(Value::Bool(true)) => Ok(Backface::Visible),
        Some(Value::Bool(false)) => Ok(Backface::Hidden),
        Some(value) => Ok(Backface::Painted(paint_from_value(scene, value)?)),
    }
}

fn parse_faces(scene: &mut Scene, obj: &Map<String, Value>) -> SceneResult<[FaceSetting; 6]> {
    let mut faces = [const { FaceSetting::Visible }; 6];
    for face in Face::ALL {
        match obj.get(face.name()) {
            None | Some(Value::Bool(true)) => {}
            Some(Value::Bool(false)) => faces[face.index()] = FaceSetting::Hidden,
            Some(value) => {
                faces[face.index()] = FaceSetting::Painted(paint_from_value(scene, value)?);
            }
        }
    }
    Ok(faces)
}

fn paint_field(
    scene: &mut Scene,
    obj: &Map<String, Value>,
    key: &str,
) -> SceneResult<Option<Paint>> {
    match obj.get(key) {
        None => Ok(None),
        Some(value) => paint_from_value(scene, value).map(Some),
    }
}

fn paint_from_value(scene: &mut Scene, value: &Value) -> SceneResult<Paint> {
    match value {
        Value::String(color) => Ok(Paint::Color(color.clone())),
        Value::Object(map) => {
            let gradient: Gradient = from_field(map, "gradient")?;
            let color_stops: Vec<ColorStop> = match map.get("colorStops") {
                Some(stops) => from_value(stops)?,
                None => Vec::new(),
            };
            let src: Option<Quad> = map.get("src").map(from_value).transpose()?;
            let dst: Option<Quad> = map.get("dst").map(from_value).transpose()?;
            let id = scene.add_texture(TextureOptions { gradient, color_stops, src, dst });
            Ok(Paint::Texture(id))
        }
        other => Err(SceneError::MalformedGraph(format!("not a paint value: {other}"))),
    }
}

fn from_field<T: serde::de::DeserializeOwned>(
    map: &Map<String, Value>,
    key: &str,
) -> SceneResult<T> {
    let value = map
        .get(key)
        .ok_or_else(|| SceneError::MalformedGraph(format!("missing texture field `{key}`")))?;
    from_value(value)
}

fn from_value<T: serde::de::DeserializeOwned>(value: &Value) -> SceneResult<T> {
    serde_json::from_value(value.clone()).map_err(|err| SceneError::MalformedGraph(err.to_string()))
}

fn parse_path(obj: &Map<String, Value>) -> SceneResult<Vec<PathStep>> {
    let Some(steps) = obj.get("path").and_then(Value::as_array) else {
        return Ok(vec![PathStep::Point(Vector::ZERO)]);
    };
    let mut parsed = Vec::with_capacity(steps.len());
    for step in steps {
        parsed.push(parse_step(step)?);
    }
    if parsed.is_empty() {
        parsed.push(PathStep::Point(Vector::ZERO));
    }
    Ok(parsed)
}

fn parse_step(value: &Value) -> SceneResult<PathStep> {
    let obj = value
        .as_object()
        .ok_or_else(|| SceneError::MalformedGraph("path step must be an object".into()))?;
    if let Some(point) = obj.get("move") {
        return Ok(PathStep::Move(point_from_value(point)));
    }
    if let Some(point) = obj.get("line") {
        return Ok(PathStep::Line(point_from_value(point)));
    }
    if let Some(points) = obj.get("bezier").and_then(Value::as_array) {
        if points.len() == 3 {
            return Ok(PathStep::Bezier([
                point_from_value(&points[0]),
                point_from_value(&points[1]),
                point_from_value(&points[2]),
            ]));
        }
        return Err(SceneError::MalformedGraph("bezier step needs 3 points".into()));
    }
    if let Some(points) = obj.get("arc").and_then(Value::as_array) {
        if points.len() == 2 {
            return Ok(PathStep::Arc([point_from_value(&points[0]), point_from_value(&points[1])]));
        }
        return Err(SceneError::MalformedGraph("arc step needs 2 points".into()));
    }
    if obj.keys().all(|key| matches!(key.as_str(), "x" | "y" | "z")) {
        return Ok(PathStep::Point(point_from_value(value)));
    }
    // permissive fallback, a straight segment keeps the rest of the path
    warn!(step = %value, "unrecognized path instruction, treating as line");
    let endpoint = obj
        .values()
        .next()
        .map(|inner| match inner {
            Value::Array(points) => {
                points.last().map(point_from_value).unwrap_or(Vector::ZERO)
            }
            other => point_from_value(other),
        })
        .unwrap_or(Vector::ZERO);
    Ok(PathStep::Line(endpoint))
}

fn point_from_value(value: &Value) -> Vector {
    match value {
        Value::Number(n) => {
            let scalar = n.as_f64().unwrap_or(0.0);
            Vector::new(scalar, scalar, scalar)
        }
        Value::Object(map) => Vector::new(
            map.get("x").and_then(Value::as_f64).unwrap_or(0.0),
            map.get("y").and_then(Value::as_f64).unwrap_or(0.0),
            map.get("z").and_then(Value::as_f64).unwrap_or(0.0),
        ),
        _ => Vector::ZERO,
    }
}

fn vector_field(
    obj: &Map<String, Value>,
    key: &str,
    default: Vector,
    default_component: f64,
) -> Vector {
    match obj.get(key) {
        None => default,
        Some(Value::Number(n)) => {
            let scalar = n.as_f64().unwrap_or(default_component);
            Vector::new(scalar, scalar, scalar)
        }
        Some(Value::Object(map)) => Vector::new(
            map.get("x").and_then(Value::as_f64).unwrap_or(default_component),
            map.get("y").and_then(Value::as_f64).unwrap_or(default_component),
            map.get("z").and_then(Value::as_f64).unwrap_or(default_component),
        ),
        Some(_) => default,
    }
}

fn f64_field(obj: &Map<String, Value>, key: &str, default: f64) -> f64 {
    obj.get(key).and_then(Value::as_f64).unwrap_or(default)
}

fn u32_field(obj: &Map<String, Value>, key: &str, default: u32) -> u32 {
    obj.get(key).and_then(Value::as_u64).map(|value| value as u32).unwrap_or(default)
}

fn bool_field(obj: &Map<String, Value>, key: &str, default: bool) -> bool {
    obj.get(key).and_then(Value::as_bool).unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::math::TAU;
    use crate::paint::Paint;
    use crate::scene::{Placement, Scene};
    use crate::shapes::{EllipseOptions, RectOptions};
    use crate::solids::CylinderOptions;
    use crate::texture::{ColorStop, Gradient, TextureOptions};

    #[test]
    fn default_anchor_exports_bare() {
        let mut scene = Scene::new();
        let anchor = scene.add_anchor(None, Placement::default()).unwrap();
        let value = export_graph(&scene, anchor).unwrap();
        assert_eq!(value, json!({ "type": "Anchor" }));
    }

    #[test]
    fn vectors_collapse_and_round() {
        let mut scene = Scene::new();
        let place = Placement {
            translate: Vector::new(2.0, 2.0, 2.0),
            rotate: Vector::new(0.0, TAU / 4.0, 0.0),
            scale: Vector::ONE,
        };
        let anchor = scene.add_anchor(None, place).unwrap();
        let value = export_graph(&scene, anchor).unwrap();
        assert_eq!(value["translate"], json!(2.0));
        assert_eq!(value["rotate"], json!({ "y": 1.571 }));
        assert!(value.get("scale").is_none());
    }

    #[test]
    fn default_fields_are_elided() {
        let mut scene = Scene::new();
        let rect = scene
            .add_rect(None, RectOptions { height: 2.0, ..Default::default() })
            .unwrap();
        let value = export_graph(&scene, rect).unwrap();
        assert_eq!(value["type"], json!("Rect"));
        assert_eq!(value["height"], json!(2.0));
        assert!(value.get("width").is_none());
        assert!(value.get("closed").is_none());
        assert!(value.get("stroke").is_none());
    }

    #[test]
    fn unknown_node_type_is_skipped() {
        let mut scene = Scene::new();
        let tree = json!({
            "type": "Anchor",
            "children": [
                { "type": "Blob", "radius": 4.0 },
                { "type": "Rect", "width": 2.0 },
            ],
        });
        let root = import_graph(&mut scene, None, &tree).unwrap().unwrap();
        assert_eq!(scene.children_of(root).len(), 1);
        let child = scene.node(scene.children_of(root)[0]).unwrap();
        assert_eq!(child.type_name(), "Rect");
    }

    #[test]
    fn unknown_path_instruction_becomes_line() {
        let mut scene = Scene::new();
        let tree = json!({
            "type": "Shape",
            "path": [
                { "move": { "x": 1.0 } },
                { "wobble": { "x": 3.0, "y": 2.0 } },
            ],
        });
        let id = import_graph(&mut scene, None, &tree).unwrap().unwrap();
        let shape = scene.node(id).unwrap().shape().unwrap();
        let commands = shape.commands();
        assert_eq!(commands.len(), 2);
        assert_eq!(commands[1].command(), crate::path::Command::Line);
        assert_eq!(commands[1].end_render_point(), Vector::new(3.0, 2.0, 0.0));
    }

    #[test]
    fn texture_paint_round_trips() {
        let mut scene = Scene::new();
        let texture = scene.add_texture(TextureOptions {
            gradient: Gradient::Linear { x1: 0.0, y1: 0.0, x2: 4.0, y2: 0.0 },
            color_stops: vec![ColorStop::new(0.0, "#e62"), ColorStop::new(1.0, "#636")],
            src: None,
            dst: None,
        });
        let ellipse = scene
            .add_ellipse(
                None,
                EllipseOptions {
                    diameter: 2.0,
                    style: crate::scene::Style {
                        color: Paint::Texture(texture),
                        fill: true,
                        ..default_style("Ellipse")
                    },
                    ..Default::default()
                },
            )
            .unwrap();
        let value = export_graph(&scene, ellipse).unwrap();

        let mut revived = Scene::new();
        let id = import_graph(&mut revived, None, &value).unwrap().unwrap();
        let style = &revived.node(id).unwrap().shape().unwrap().style;
        let Paint::Texture(new_id) = style.color else {
            panic!("expected texture paint, got {:?}", style.color);
        };
        let revived_texture = revived.texture(new_id).unwrap();
        assert_eq!(
            revived_texture.gradient,
            Gradient::Linear { x1: 0.0, y1: 0.0, x2: 4.0, y2: 0.0 }
        );
        assert_eq!(revived_texture.color_stops.len(), 2);
        assert_eq!(revived_texture.color_stops[1].color, "#636");
    }

    #[test]
    fn cylinder_round_trip_rebuilds_parts() {
        let mut scene = Scene::new();
        let handle = scene
            .add_cylinder(
                None,
                CylinderOptions {
                    diameter: 2.0,
                    length: 3.0,
                    color: Paint::from("#e62"),
                    ..Default::default()
                },
            )
            .unwrap();
        let value = export_graph(&scene, handle.root).unwrap();
        assert_eq!(value["diameter"], json!(2.0));
        assert_eq!(value["length"], json!(3.0));
        assert!(value.get("children").is_none());

        let mut revived = Scene::new();
        let id = import_graph(&mut revived, None, &value).unwrap().unwrap();
        // root, sorting group, two caps
        assert_eq!(revived.node_count(), 4);
        let composite = revived.node(id).unwrap().composite().unwrap();
        assert_eq!(composite.color, Paint::from("#e62"));
    }

    #[test]
    fn round_trip_preserves_sort_values() {
        let mut scene = Scene::new();
        let root = scene.add_anchor(None, Placement::default()).unwrap();
        scene
            .add_ellipse(
                Some(root),
                EllipseOptions {
                    diameter: 2.0,
                    place: Placement::at(Vector::new(0.0, 0.0, 3.0)),
                    ..Default::default()
                },
            )
            .unwrap();
        scene
            .add_rect(
                Some(root),
                RectOptions {
                    // rotation is exact at 3 decimals so export is lossless
                    place: Placement {
                        translate: Vector::new(0.0, 0.0, -2.0),
                        rotate: Vector::new(0.0, 0.5, 0.0),
                        scale: Vector::ONE,
                    },
                    ..Default::default()
                },
            )
            .unwrap();
        scene
            .add_cylinder(
                Some(root),
                CylinderOptions {
                    length: 4.0,
                    place: Placement::rotated(Vector::new(0.5, 0.0, 0.0)),
                    ..Default::default()
                },
            )
            .unwrap();
        scene.update_graph(root).unwrap();
        let original = sorted_depths(&scene, root);

        let value = export_graph(&scene, root).unwrap();
        let mut revived = Scene::new();
        let new_root = import_graph(&mut revived, None, &value).unwrap().unwrap();
        revived.update_graph(new_root).unwrap();
        assert_eq!(sorted_depths(&revived, new_root), original);
    }

    fn sorted_depths(scene: &Scene, root: Uuid) -> Vec<f64> {
        scene
            .flat_graph_of(root)
            .iter()
            .map(|id| round3(scene.node(*id).unwrap().sort_value()))
            .collect()
    }
}
