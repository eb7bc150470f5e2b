use crate::component::{Camera, Component, Light, PhysicsBody, Renderable, Script};
use lumen_common::{EntityId, Transform};
use std::any::{Any, TypeId};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::{Path, PathBuf};

/// Errors from world operations.
#[derive(Debug, thiserror::Error)]
pub enum EcsError {
    #[error("entity {0} is not alive")]
    EntityNotFound(EntityId),
    #[error("entity ids exhausted")]
    IdsExhausted,
}

/// Type-erased view of one component table, so the world can clear an entity
/// from every table without knowing the component types.
trait ErasedTable {
    fn tag(&self) -> &'static str;
    fn remove_entity(&mut self, entity: EntityId) -> bool;
    fn len(&self) -> usize;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

struct Table<T: Component>(BTreeMap<EntityId, T>);

impl<T: Component> ErasedTable for Table<T> {
    fn tag(&self) -> &'static str {
        T::TAG
    }

    fn remove_entity(&mut self, entity: EntityId) -> bool {
        self.0.remove(&entity).is_some()
    }

    fn len(&self) -> usize {
        self.0.len()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// The entity-component store.
///
/// One table per component type, keyed by [`TypeId`]. Every table is a
/// BTreeMap so iteration is always in ascending entity id order, which gives
/// the renderer its draw/light order and the physics bridge its tick order.
///
/// # Invariants
/// - Every live entity has a [`Transform`] for its whole lifetime.
/// - Destroying an entity removes it from every registered table and from the
///   marker table.
/// - Ids are never reused.
pub struct World {
    path: PathBuf,
    next_id: EntityId,
    entities: BTreeSet<EntityId>,
    markers: BTreeMap<EntityId, String>,
    tables: HashMap<TypeId, Box<dyn ErasedTable>>,
}

impl World {
    /// Create an empty world bound to its persisted identity.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let mut world = Self {
            path: path.into(),
            next_id: EntityId::FIRST,
            entities: BTreeSet::new(),
            markers: BTreeMap::new(),
            tables: HashMap::new(),
        };
        world.register::<Transform>();
        world.register::<Renderable>();
        world.register::<PhysicsBody>();
        world.register::<Camera>();
        world.register::<Light>();
        world.register::<Script>();
        world
    }

    /// Path this world is persisted under.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The id the next `create_entity` call will return.
    pub fn next_entity_id(&self) -> EntityId {
        self.next_id
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    pub fn is_alive(&self, entity: EntityId) -> bool {
        self.entities.contains(&entity)
    }

    /// Live entities in ascending id order.
    pub fn entities(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.entities.iter().copied()
    }

    /// Register a component table. Built-in components are registered by
    /// [`World::new`]; registering twice is harmless.
    pub fn register<T: Component>(&mut self) {
        self.tables
            .entry(TypeId::of::<T>())
            .or_insert_with(|| Box::new(Table::<T>(BTreeMap::new())));
    }

    pub fn is_registered<T: Component>(&self) -> bool {
        self.tables.contains_key(&TypeId::of::<T>())
    }

    /// Serialization tags of every registered table, sorted.
    pub fn component_tags(&self) -> Vec<&'static str> {
        let mut tags: Vec<_> = self.tables.values().map(|t| t.tag()).collect();
        tags.sort_unstable();
        tags
    }

    /// Allocate a new entity with a default [`Transform`].
    pub fn create_entity(&mut self) -> Result<EntityId, EcsError> {
        let id = self.next_id;
        if id.is_null() {
            return Err(EcsError::IdsExhausted);
        }
        self.next_id = id.next().unwrap_or(EntityId::NULL);
        self.entities.insert(id);
        self.table_mut::<Transform>().insert(id, Transform::default());
        tracing::debug!(entity = %id, "entity created");
        Ok(id)
    }

    /// Remove an entity and every component and marker attached to it.
    /// Returns false if the entity was not alive.
    pub fn destroy_entity(&mut self, entity: EntityId) -> bool {
        if !self.entities.remove(&entity) {
            return false;
        }
        let mut removed = 0;
        for table in self.tables.values_mut() {
            if table.remove_entity(entity) {
                removed += 1;
            }
        }
        self.markers.remove(&entity);
        tracing::debug!(entity = %entity, components = removed, "entity destroyed");
        true
    }

    /// Insert a default `T` for `entity` if it has none, then return it.
    /// An existing value is kept as is.
    pub fn new_component<T: Component>(&mut self, entity: EntityId) -> Result<&mut T, EcsError> {
        self.ensure_alive(entity)?;
        Ok(self.table_mut::<T>().entry(entity).or_default())
    }

    /// Set `T` for `entity`, replacing and returning any previous value.
    pub fn insert_component<T: Component>(
        &mut self,
        entity: EntityId,
        value: T,
    ) -> Result<Option<T>, EcsError> {
        self.ensure_alive(entity)?;
        Ok(self.table_mut::<T>().insert(entity, value))
    }

    pub fn get_component<T: Component>(&self, entity: EntityId) -> Option<&T> {
        self.table::<T>()?.get(&entity)
    }

    pub fn get_component_mut<T: Component>(&mut self, entity: EntityId) -> Option<&mut T> {
        self.table_slot_mut::<T>()?.get_mut(&entity)
    }

    pub fn contains_component<T: Component>(&self, entity: EntityId) -> bool {
        self.table::<T>().is_some_and(|t| t.contains_key(&entity))
    }

    /// Remove only `T` from `entity`.
    ///
    /// The transform of a live entity cannot be removed; it goes away with
    /// [`World::destroy_entity`].
    pub fn remove_component<T: Component>(&mut self, entity: EntityId) -> Option<T> {
        if TypeId::of::<T>() == TypeId::of::<Transform>() && self.is_alive(entity) {
            tracing::warn!(entity = %entity, "refusing to remove the transform of a live entity");
            return None;
        }
        self.table_slot_mut::<T>()?.remove(&entity)
    }

    /// The full table for `T`, or `None` if `T` was never registered.
    pub fn component_set<T: Component>(&self) -> Option<&BTreeMap<EntityId, T>> {
        self.table::<T>()
    }

    /// Mutable table for `T`, registering it on first use.
    ///
    /// Callers must not insert entries for dead entities; use
    /// [`World::new_component`] or [`World::insert_component`] to add.
    pub fn component_set_mut<T: Component>(&mut self) -> &mut BTreeMap<EntityId, T> {
        self.table_mut::<T>()
    }

    /// Ascending-id iteration over every `T`.
    pub fn iter<T: Component>(&self) -> impl Iterator<Item = (EntityId, &T)> + '_ {
        self.table::<T>()
            .into_iter()
            .flat_map(|t| t.iter().map(|(id, c)| (*id, c)))
    }

    pub fn component_count<T: Component>(&self) -> usize {
        self.tables
            .get(&TypeId::of::<T>())
            .map_or(0, |t| t.len())
    }

    // --- Markers ---

    /// Tag an entity, returning the previous tag.
    pub fn set_marker(
        &mut self,
        entity: EntityId,
        marker: impl Into<String>,
    ) -> Result<Option<String>, EcsError> {
        self.ensure_alive(entity)?;
        Ok(self.markers.insert(entity, marker.into()))
    }

    pub fn marker(&self, entity: EntityId) -> Option<&str> {
        self.markers.get(&entity).map(String::as_str)
    }

    pub fn remove_marker(&mut self, entity: EntityId) -> Option<String> {
        self.markers.remove(&entity)
    }

    pub fn markers(&self) -> &BTreeMap<EntityId, String> {
        &self.markers
    }

    /// Entities carrying `marker`, ascending.
    pub fn find_marked<'a>(&'a self, marker: &'a str) -> impl Iterator<Item = EntityId> + 'a {
        self.markers
            .iter()
            .filter(move |(_, m)| m.as_str() == marker)
            .map(|(id, _)| *id)
    }

    fn ensure_alive(&self, entity: EntityId) -> Result<(), EcsError> {
        if self.is_alive(entity) {
            Ok(())
        } else {
            Err(EcsError::EntityNotFound(entity))
        }
    }

    fn table<T: Component>(&self) -> Option<&BTreeMap<EntityId, T>> {
        self.tables
            .get(&TypeId::of::<T>())?
            .as_any()
            .downcast_ref::<Table<T>>()
            .map(|t| &t.0)
    }

    fn table_slot_mut<T: Component>(&mut self) -> Option<&mut BTreeMap<EntityId, T>> {
        self.tables
            .get_mut(&TypeId::of::<T>())?
            .as_any_mut()
            .downcast_mut::<Table<T>>()
            .map(|t| &mut t.0)
    }

    fn table_mut<T: Component>(&mut self) -> &mut BTreeMap<EntityId, T> {
        self.register::<T>();
        match self.table_slot_mut::<T>() {
            Some(table) => table,
            None => unreachable!("component table stored under a foreign TypeId"),
        }
    }
}

impl std::fmt::Debug for World {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("World")
            .field("path", &self.path)
            .field("next_id", &self.next_id)
            .field("entities", &self.entities.len())
            .field("tables", &self.component_tags())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    #[derive(Debug, Default, PartialEq)]
    struct Health(u32);

    impl Component for Health {
        const TAG: &'static str = "Health";
    }

    fn world() -> World {
        World::new("worlds/test.world")
    }

    #[test]
    fn world_starts_empty() {
        let w = world();
        assert_eq!(w.entity_count(), 0);
        assert_eq!(w.next_entity_id(), EntityId::FIRST);
        assert_eq!(w.path(), Path::new("worlds/test.world"));
    }

    #[test]
    fn created_entity_has_transform() {
        let mut w = world();
        for _ in 0..10 {
            let id = w.create_entity().unwrap();
            assert!(w.get_component::<Transform>(id).is_some());
        }
    }

    #[test]
    fn ids_increase_and_are_not_reused() {
        let mut w = world();
        let a = w.create_entity().unwrap();
        let b = w.create_entity().unwrap();
        assert!(b > a);
        w.destroy_entity(b);
        let c = w.create_entity().unwrap();
        assert!(c > b);
    }

    #[test]
    fn exhausted_ids_are_an_error() {
        let mut w = world();
        w.next_id = EntityId(u32::MAX - 1);
        let last = w.create_entity().unwrap();
        assert_eq!(last, EntityId(u32::MAX - 1));
        assert!(matches!(w.create_entity(), Err(EcsError::IdsExhausted)));
        assert_eq!(w.entity_count(), 1);
        assert!(w.next_entity_id().is_null());
    }

    #[test]
    fn new_component_keeps_existing_value() {
        let mut w = world();
        let id = w.create_entity().unwrap();
        w.new_component::<Light>(id).unwrap().intensity = 5.0;
        let again = w.new_component::<Light>(id).unwrap();
        assert_eq!(again.intensity, 5.0);
        assert_eq!(w.component_count::<Light>(), 1);
    }

    #[test]
    fn insert_component_overwrites() {
        let mut w = world();
        let id = w.create_entity().unwrap();
        w.new_component::<Light>(id).unwrap();
        let previous = w
            .insert_component(
                id,
                Light {
                    intensity: 2.0,
                    ..Light::default()
                },
            )
            .unwrap();
        assert_eq!(previous.map(|l| l.intensity), Some(1.0));
        assert_eq!(w.get_component::<Light>(id).unwrap().intensity, 2.0);
    }

    #[test]
    fn components_on_dead_entities_are_rejected() {
        let mut w = world();
        let id = w.create_entity().unwrap();
        w.destroy_entity(id);
        assert!(matches!(
            w.new_component::<Camera>(id),
            Err(EcsError::EntityNotFound(_))
        ));
        assert!(w.new_component::<Camera>(EntityId::NULL).is_err());
    }

    #[test]
    fn get_missing_component_is_none() {
        let mut w = world();
        let id = w.create_entity().unwrap();
        assert!(w.get_component::<Camera>(id).is_none());
        assert!(!w.contains_component::<Camera>(id));
        assert!(w.get_component::<Health>(id).is_none());
    }

    #[test]
    fn remove_component_only_touches_one_table() {
        let mut w = world();
        let id = w.create_entity().unwrap();
        w.new_component::<Camera>(id).unwrap();
        w.new_component::<Light>(id).unwrap();
        assert!(w.remove_component::<Camera>(id).is_some());
        assert!(!w.contains_component::<Camera>(id));
        assert!(w.contains_component::<Light>(id));
        assert!(w.contains_component::<Transform>(id));
    }

    #[test]
    fn transform_cannot_be_removed_from_live_entity() {
        let mut w = world();
        let id = w.create_entity().unwrap();
        assert!(w.remove_component::<Transform>(id).is_none());
        assert!(w.contains_component::<Transform>(id));
    }

    #[test]
    fn destroy_entity_clears_every_table() {
        let mut w = world();
        let id = w.create_entity().unwrap();
        let keep = w.create_entity().unwrap();
        w.new_component::<Renderable>(id).unwrap();
        w.new_component::<PhysicsBody>(id).unwrap();
        w.new_component::<Camera>(id).unwrap();
        w.new_component::<Light>(id).unwrap();
        w.new_component::<Script>(id).unwrap();
        w.new_component::<Health>(id).unwrap();
        w.new_component::<Light>(keep).unwrap();
        w.set_marker(id, "player").unwrap();

        assert!(w.destroy_entity(id));
        assert!(!w.is_alive(id));
        assert!(w.get_component::<Transform>(id).is_none());
        assert!(w.get_component::<Renderable>(id).is_none());
        assert!(w.get_component::<PhysicsBody>(id).is_none());
        assert!(w.get_component::<Camera>(id).is_none());
        assert!(w.get_component::<Light>(id).is_none());
        assert!(w.get_component::<Script>(id).is_none());
        assert!(w.get_component::<Health>(id).is_none());
        assert!(w.marker(id).is_none());

        assert!(w.contains_component::<Light>(keep));
        assert!(w.contains_component::<Transform>(keep));
    }

    #[test]
    fn destroying_twice_is_harmless() {
        let mut w = world();
        let id = w.create_entity().unwrap();
        assert!(w.destroy_entity(id));
        assert!(!w.destroy_entity(id));
    }

    #[test]
    fn component_sets_iterate_in_ascending_order() {
        let mut w = world();
        let ids: Vec<EntityId> = (0..20).map(|_| w.create_entity().unwrap()).collect();
        for id in ids.iter().rev() {
            w.new_component::<Light>(*id).unwrap();
        }
        let keys: Vec<EntityId> = w.iter::<Light>().map(|(id, _)| id).collect();
        assert_eq!(keys, ids);
        let set_keys: Vec<EntityId> = w.component_set::<Light>().unwrap().keys().copied().collect();
        assert_eq!(set_keys, ids);
    }

    #[test]
    fn component_set_mut_mutates_in_place() {
        let mut w = world();
        let id = w.create_entity().unwrap();
        for transform in w.component_set_mut::<Transform>().values_mut() {
            transform.position = Vec2::new(4.0, 2.0);
        }
        assert_eq!(
            w.get_component::<Transform>(id).unwrap().position,
            Vec2::new(4.0, 2.0)
        );
    }

    #[test]
    fn unregistered_component_has_no_set() {
        let w = world();
        assert!(w.component_set::<Health>().is_none());
        assert_eq!(w.iter::<Health>().count(), 0);
        assert!(!w.is_registered::<Health>());
    }

    #[test]
    fn component_tags_list_registered_tables() {
        let mut w = world();
        w.register::<Health>();
        let tags = w.component_tags();
        for tag in ["Camera", "Health", "Light", "PhysicsBody", "Renderable", "Script", "Transform"] {
            assert!(tags.contains(&tag), "missing {tag}");
        }
    }

    #[test]
    fn markers_support_lookup() {
        let mut w = world();
        let a = w.create_entity().unwrap();
        let b = w.create_entity().unwrap();
        let c = w.create_entity().unwrap();
        w.set_marker(a, "player").unwrap();
        w.set_marker(b, "enemy").unwrap();
        w.set_marker(c, "player").unwrap();
        let players: Vec<EntityId> = w.find_marked("player").collect();
        assert_eq!(players, vec![a, c]);
        assert_eq!(w.marker(b), Some("enemy"));
        assert_eq!(w.remove_marker(b).as_deref(), Some("enemy"));
        assert!(w.marker(b).is_none());
    }
}
