//! Canonical JSON serialisation of the view tree (§6). The schema is
//! normative — key set and order must match exactly, since this JSON is
//! the comparison surface for differential testing against a reference
//! browser. Built with an explicit key-by-key `serde_json::Map` rather
//! than deriving `Serialize` on `ViewNode` directly, since the wire schema
//! differs from the arena's internal field names (`kind` -> `type`,
//! `bounds.{x,y,width,height}` flattened, etc).

use serde_json::{Map, Number, Value};

use webbox_dom::{Arena, NodeId, Offsets, ViewNode, ViewTree};

pub fn to_json(tree: &ViewTree) -> Value {
    node_to_json(&tree.arena, tree.root)
}

fn node_to_json(arena: &Arena<ViewNode>, id: NodeId) -> Value {
    let node = arena.get(id);
    let mut obj = Map::new();
    obj.insert("type".to_string(), Value::String(node.kind.as_json_type().to_string()));
    if let Some(tag) = &node.tag {
        obj.insert("tag".to_string(), Value::String(tag.clone()));
    }
    obj.insert("x".to_string(), num(node.bounds.x));
    obj.insert("y".to_string(), num(node.bounds.y));
    obj.insert("width".to_string(), num(node.bounds.width));
    obj.insert("height".to_string(), num(node.bounds.height));
    obj.insert("coordinate_system".to_string(), Value::String("css_logical_pixels".to_string()));
    obj.insert("content_width".to_string(), num(node.content_width));
    obj.insert("content_height".to_string(), num(node.content_height));
    obj.insert("padding".to_string(), edges(&node.padding));
    obj.insert("border".to_string(), edges(&node.border));
    obj.insert("margin".to_string(), edges(&node.margin));
    let children: Vec<Value> = arena.children(id).map(|child| node_to_json(arena, child)).collect();
    obj.insert("children".to_string(), Value::Array(children));
    if let Some(text) = &node.text {
        obj.insert("text".to_string(), Value::String(text.clone()));
    }
    Value::Object(obj)
}

fn edges(e: &Offsets) -> Value {
    let [top, right, bottom, left] = e.as_array();
    Value::Array(vec![num(top), num(right), num(bottom), num(left)])
}

fn num(v: f32) -> Value {
    Number::from_f64(v as f64).map(Value::Number).unwrap_or(Value::from(0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{layout, DocumentScale, LayoutOptions, Viewport};
    use webbox_dom::fixture::{FixtureDocument, FixtureNode};
    use webbox_text::SimpleTextShaper;

    #[test]
    fn root_block_serialises_with_the_normative_key_order() {
        let doc = FixtureDocument::from_root(FixtureNode::element("html"));
        let shaper = SimpleTextShaper::new();
        let tree = layout(&doc, Viewport::default(), DocumentScale::default(), &shaper, LayoutOptions::default()).unwrap();
        let value = to_json(&tree);
        let obj = value.as_object().unwrap();
        let keys: Vec<&String> = obj.keys().collect();
        assert_eq!(keys[0], "type");
        assert_eq!(obj["type"], "block");
        assert!(obj.contains_key("children"));
    }
}
