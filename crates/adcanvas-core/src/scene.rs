//! Scene graph: the ordered object sequence and the selection.

use crate::shapes::{Group, Shape, ShapeId, ShapeKind, union_bounds};
use kurbo::{Point, Rect};
use std::collections::HashSet;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Scene errors.
#[derive(Debug, Error)]
pub enum SceneError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Object not found: {0}")]
    NotFound(ShapeId),
    #[error("Object {id} is not {expected}")]
    WrongKind { id: ShapeId, expected: &'static str },
}

/// Result type for scene operations.
pub type SceneResult<T> = Result<T, SceneError>;

/// Serialized form of a scene.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneDocument {
    /// Top-level objects in paint order.
    pub objects: Vec<Shape>,
}

impl SceneDocument {
    pub fn to_json(&self) -> SceneResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> SceneResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// One row of the layer list, top layer first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerInfo {
    pub id: ShapeId,
    pub name: String,
    pub kind: String,
    pub visible: bool,
    pub locked: bool,
    pub opacity: f64,
}

/// Ordered sequence of top-level objects plus the current selection.
///
/// Index 0 paints first (back-most). The sequence is the only record of
/// z-order.
#[derive(Debug, Clone, Default)]
pub struct SceneGraph {
    objects: Vec<Shape>,
    selection: Vec<ShapeId>,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Objects in paint order.
    pub fn objects(&self) -> &[Shape] {
        &self.objects
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Append an object, assigning a fresh identifier if it has none or its
    /// identifier is already in use. Returns the identifier.
    pub fn add(&mut self, shape: Shape) -> ShapeId {
        let index = self.objects.len();
        self.insert(index, shape)
    }

    /// Insert an object at a paint-order index (clamped).
    pub fn insert(&mut self, index: usize, mut shape: Shape) -> ShapeId {
        let mut seen = HashSet::new();
        let taken = shape
            .all_ids()
            .into_iter()
            .any(|id| id.is_nil() || !seen.insert(id) || self.contains(id));
        if taken {
            shape.regenerate_ids();
        }
        let id = shape.id();
        let index = index.min(self.objects.len());
        self.objects.insert(index, shape);
        id
    }

    /// Remove a top-level object.
    pub fn remove(&mut self, id: ShapeId) -> Option<Shape> {
        let index = self.index_of(id)?;
        self.selection.retain(|&s| s != id);
        Some(self.objects.remove(index))
    }

    /// Remove several top-level objects, returning the removed ones.
    pub fn remove_many(&mut self, ids: &[ShapeId]) -> Vec<Shape> {
        ids.iter().filter_map(|&id| self.remove(id)).collect()
    }

    pub fn clear(&mut self) {
        self.objects.clear();
        self.selection.clear();
    }

    /// Replace every object, dropping the selection.
    pub fn replace_objects(&mut self, objects: Vec<Shape>) {
        self.objects = objects;
        self.selection.clear();
    }

    /// Top-level object by identifier.
    pub fn get(&self, id: ShapeId) -> Option<&Shape> {
        self.objects.iter().find(|s| s.id() == id)
    }

    pub fn get_mut(&mut self, id: ShapeId) -> Option<&mut Shape> {
        self.objects.iter_mut().find(|s| s.id() == id)
    }

    /// Any object, including group descendants.
    pub fn find(&self, id: ShapeId) -> Option<&Shape> {
        self.objects.iter().find_map(|s| s.find(id))
    }

    pub fn find_mut(&mut self, id: ShapeId) -> Option<&mut Shape> {
        self.objects.iter_mut().find_map(|s| s.find_mut(id))
    }

    pub fn contains(&self, id: ShapeId) -> bool {
        self.find(id).is_some()
    }

    pub fn index_of(&self, id: ShapeId) -> Option<usize> {
        self.objects.iter().position(|s| s.id() == id)
    }

    /// Identifier of the group directly owning `id`, if any.
    pub fn parent_of(&self, id: ShapeId) -> Option<ShapeId> {
        fn search(shape: &Shape, id: ShapeId) -> Option<ShapeId> {
            let group = shape.as_group()?;
            if group.children.iter().any(|c| c.id() == id) {
                return Some(shape.id());
            }
            group.children.iter().find_map(|c| search(c, id))
        }
        self.objects.iter().find_map(|s| search(s, id))
    }

    /// Bounding box of every object, `None` when the scene is empty.
    pub fn bounds(&self) -> Option<Rect> {
        union_bounds(&self.objects)
    }

    /// Front-most visible object under a scene point.
    pub fn object_at(&self, point: Point, tolerance: f64) -> Option<ShapeId> {
        self.objects
            .iter()
            .rev()
            .filter(|s| s.visible)
            .find(|s| s.hit_test(point, tolerance))
            .map(Shape::id)
    }

    /// Visible, unlocked objects intersecting a rectangle, in paint order.
    pub fn selectable_in_rect(&self, rect: Rect) -> Vec<ShapeId> {
        self.objects
            .iter()
            .filter(|s| s.visible && !s.locked && s.intersects_rect(rect))
            .map(Shape::id)
            .collect()
    }

    // --- Selection -------------------------------------------------------

    /// Selected identifiers in selection order.
    pub fn selected_ids(&self) -> &[ShapeId] {
        &self.selection
    }

    pub fn selected(&self) -> impl Iterator<Item = &Shape> {
        self.selection.iter().filter_map(|&id| self.get(id))
    }

    pub fn is_selected(&self, id: ShapeId) -> bool {
        self.selection.contains(&id)
    }

    fn is_selectable(&self, id: ShapeId) -> bool {
        self.get(id).is_some_and(|s| !s.locked)
    }

    /// Replace the selection, skipping missing and locked objects.
    /// Returns whether the selection changed.
    pub fn set_selection(&mut self, ids: &[ShapeId]) -> bool {
        let mut next: Vec<ShapeId> = Vec::with_capacity(ids.len());
        for &id in ids {
            if self.is_selectable(id) && !next.contains(&id) {
                next.push(id);
            }
        }
        if next == self.selection {
            return false;
        }
        self.selection = next;
        true
    }

    /// Select a single object.
    pub fn select(&mut self, id: ShapeId) -> bool {
        self.set_selection(&[id])
    }

    /// Add or remove one object from the selection.
    pub fn toggle_selection(&mut self, id: ShapeId) -> bool {
        if self.is_selected(id) {
            self.selection.retain(|&s| s != id);
            true
        } else if self.is_selectable(id) {
            self.selection.push(id);
            true
        } else {
            false
        }
    }

    pub fn clear_selection(&mut self) -> bool {
        if self.selection.is_empty() {
            return false;
        }
        self.selection.clear();
        true
    }

    /// Union of the selected objects' bounds.
    pub fn selection_bounds(&self) -> Option<Rect> {
        union_bounds(self.selected())
    }

    /// Lock or unlock an object; locking drops it from the selection.
    pub fn set_locked(&mut self, id: ShapeId, locked: bool) -> SceneResult<()> {
        let shape = self.find_mut(id).ok_or(SceneError::NotFound(id))?;
        shape.locked = locked;
        if locked {
            self.selection.retain(|&s| s != id);
        }
        Ok(())
    }

    // --- Z-order -----------------------------------------------------------

    /// Move an object one step toward the front. Returns false at the top.
    pub fn bring_forward(&mut self, id: ShapeId) -> bool {
        match self.index_of(id) {
            Some(pos) if pos + 1 < self.objects.len() => {
                self.objects.swap(pos, pos + 1);
                true
            }
            _ => false,
        }
    }

    /// Move an object one step toward the back. Returns false at the bottom.
    pub fn send_backward(&mut self, id: ShapeId) -> bool {
        match self.index_of(id) {
            Some(pos) if pos > 0 => {
                self.objects.swap(pos, pos - 1);
                true
            }
            _ => false,
        }
    }

    /// Move several objects one step toward the front as a block.
    ///
    /// An object whose slot above is the top or a selected object that could
    /// not move stays put, so relative order is kept at the boundary.
    pub fn bring_forward_many(&mut self, ids: &[ShapeId]) -> bool {
        let mut changed = false;
        let mut blocked = true;
        for pos in (0..self.objects.len()).rev() {
            if !ids.contains(&self.objects[pos].id()) {
                blocked = false;
            } else if !blocked {
                self.objects.swap(pos, pos + 1);
                changed = true;
            }
        }
        changed
    }

    /// Move several objects one step toward the back as a block.
    pub fn send_backward_many(&mut self, ids: &[ShapeId]) -> bool {
        let mut changed = false;
        let mut blocked = true;
        for pos in 0..self.objects.len() {
            if !ids.contains(&self.objects[pos].id()) {
                blocked = false;
            } else if !blocked {
                self.objects.swap(pos, pos - 1);
                changed = true;
            }
        }
        changed
    }

    pub fn bring_to_front(&mut self, id: ShapeId) -> bool {
        let last = self.objects.len().saturating_sub(1);
        self.move_to_index(id, last)
    }

    pub fn send_to_back(&mut self, id: ShapeId) -> bool {
        self.move_to_index(id, 0)
    }

    /// Move an object to a paint-order index (clamped). Returns whether it moved.
    pub fn move_to_index(&mut self, id: ShapeId, index: usize) -> bool {
        let Some(pos) = self.index_of(id) else {
            return false;
        };
        let index = index.min(self.objects.len() - 1);
        if pos == index {
            return false;
        }
        let shape = self.objects.remove(pos);
        self.objects.insert(index, shape);
        true
    }

    // --- Grouping ----------------------------------------------------------

    /// Wrap top-level objects in a new group placed at the front-most
    /// member's position. Needs at least two members.
    pub fn group(&mut self, ids: &[ShapeId]) -> Option<ShapeId> {
        let members: Vec<usize> = self
            .objects
            .iter()
            .enumerate()
            .filter(|(_, s)| ids.contains(&s.id()))
            .map(|(i, _)| i)
            .collect();
        if members.len() < 2 {
            return None;
        }
        let front = *members.last()?;
        let insert_at = front + 1 - members.len();

        let mut children = Vec::with_capacity(members.len());
        for &index in members.iter().rev() {
            children.push(self.objects.remove(index));
        }
        children.reverse();
        for child in &children {
            self.selection.retain(|&s| s != child.id());
        }

        let group = Shape::group(children);
        let group_id = group.id();
        self.objects.insert(insert_at, group);
        Some(group_id)
    }

    /// Dissolve a top-level group, returning its children to the sequence at
    /// the group's position.
    pub fn ungroup(&mut self, id: ShapeId) -> Option<Vec<ShapeId>> {
        let index = self.index_of(id)?;
        if !self.objects[index].is_group() {
            return None;
        }
        let shape = self.objects.remove(index);
        self.selection.retain(|&s| s != id);
        let ShapeKind::Group(group) = shape.kind else {
            return None;
        };
        let children = Group::ungroup(group);
        let ids = children.iter().map(Shape::id).collect();
        for (offset, child) in children.into_iter().enumerate() {
            self.objects.insert(index + offset, child);
        }
        Some(ids)
    }

    // --- Serialization -----------------------------------------------------

    pub fn to_document(&self) -> SceneDocument {
        SceneDocument {
            objects: self.objects.clone(),
        }
    }

    pub fn into_document(self) -> SceneDocument {
        SceneDocument {
            objects: self.objects,
        }
    }

    pub fn to_json(&self) -> SceneResult<String> {
        #[derive(Serialize)]
        struct View<'a> {
            objects: &'a [Shape],
        }
        Ok(serde_json::to_string(&View {
            objects: &self.objects,
        })?)
    }

    /// Layer rows, top layer first.
    pub fn layers(&self) -> Vec<LayerInfo> {
        self.objects
            .iter()
            .enumerate()
            .map(|(index, shape)| LayerInfo {
                id: shape.id(),
                name: shape.display_name(index),
                kind: shape.shape_type().as_str().to_string(),
                visible: shape.visible,
                locked: shape.locked,
                opacity: shape.style.opacity,
            })
            .rev()
            .collect()
    }
}

impl From<SceneDocument> for SceneGraph {
    fn from(document: SceneDocument) -> Self {
        let mut scene = SceneGraph::new();
        for shape in document.objects {
            scene.add(shape);
        }
        scene
    }
}

/// Nil identifier marking an object that has not been added yet.
pub fn unassigned_id() -> ShapeId {
    Uuid::nil()
}
