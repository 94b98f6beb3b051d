//! The world: entity store, per-entity masks, and one store per component.
//!
//! A [`World`] owns everything and is passed by `&mut` to systems. Every
//! structural change goes through methods that update the mask and the
//! component store together, so for every live entity and registered
//! component the mask bit is set exactly when the store holds a value.
//!
//! Component types are registered on a [`WorldBuilder`] before the world
//! exists; the resulting registry never changes.

use std::any::type_name;
use std::collections::VecDeque;
use std::fmt;

use bagel_foundation::{ComponentBit, EntityId, Error, Mask, Result};
use tracing::{debug, trace, warn};

use crate::command::{Command, Queued, StepReport};
use crate::component::{Bundle, Component};
use crate::config::WorldConfig;
use crate::entity::EntityStore;
use crate::query::{EntityIds, Query, mask_matches};
use crate::registry::ComponentRegistry;
use crate::store::{ComponentStore, ErasedStore, TypedStore};

/// Startup-time world construction.
///
/// ```rust,ignore
/// let mut world = WorldBuilder::new(WorldConfig::default())
///     .register::<Position>()?
///     .register::<Velocity>()?
///     .build();
/// ```
pub struct WorldBuilder {
    config: WorldConfig,
    registry: ComponentRegistry,
    stores: Vec<Box<dyn ErasedStore>>,
}

impl Default for WorldBuilder {
    fn default() -> Self {
        Self::new(WorldConfig::default())
    }
}

impl WorldBuilder {
    /// Starts a builder with the given configuration.
    #[must_use]
    pub fn new(config: WorldConfig) -> Self {
        Self {
            config,
            registry: ComponentRegistry::new(),
            stores: Vec::new(),
        }
    }

    /// Registers component type `T`, assigning it the next bit.
    ///
    /// # Errors
    ///
    /// Returns an error if `T` is already registered or the mask has no
    /// free bit left.
    pub fn register<T: Component>(mut self) -> Result<Self> {
        let bit = self.registry.register::<T>()?;
        self.stores.push(Box::new(TypedStore::<T>::with_capacity(
            self.config.initial_capacity,
        )));

        let kind = <T::Storage as ComponentStore<T>>::KIND;
        debug!(
            component = type_name::<T>(),
            bit = bit.index(),
            %kind,
            "registered component"
        );
        Ok(self)
    }

    /// Finishes registration and creates an empty world.
    #[must_use]
    pub fn build(self) -> World {
        let Self {
            config,
            registry,
            stores,
        } = self;

        let mut entities = EntityStore::with_capacity(config.initial_capacity);
        if let Some(limit) = config.entity_limit() {
            entities = entities.with_limit(limit);
        }

        debug!(
            components = registry.len(),
            capacity = config.initial_capacity,
            dynamic_resize = config.dynamic_resize,
            "built world"
        );

        World {
            masks: Vec::with_capacity(config.initial_capacity),
            commands: VecDeque::with_capacity(config.command_capacity),
            config,
            registry,
            entities,
            stores,
            frame: 0,
        }
    }
}

impl fmt::Debug for WorldBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorldBuilder")
            .field("config", &self.config)
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}

/// Entities, their masks, and all component values.
pub struct World {
    config: WorldConfig,
    registry: ComponentRegistry,
    entities: EntityStore,
    /// One mask per id ever allocated; dead ids hold an empty mask.
    masks: Vec<Mask>,
    /// Indexed by component bit.
    stores: Vec<Box<dyn ErasedStore>>,
    commands: VecDeque<Queued>,
    frame: u64,
}

impl World {
    // ========================================================================
    // Entity lifecycle
    // ========================================================================

    /// Creates an entity with no components.
    ///
    /// # Panics
    ///
    /// Panics if the world has a fixed capacity and it is exhausted. Use
    /// [`try_create`](Self::try_create) to handle that case.
    pub fn create(&mut self) -> EntityId {
        match self.try_create() {
            Ok(id) => id,
            Err(err) => panic!("cannot create entity: {err}"),
        }
    }

    /// Creates an entity with no components.
    ///
    /// Destroyed ids are reused, most recently destroyed first.
    ///
    /// # Errors
    ///
    /// Returns an error if the world has a fixed capacity and every id is in
    /// use.
    pub fn try_create(&mut self) -> Result<EntityId> {
        let id = self.entities.try_create().inspect_err(|err| {
            warn!(live = self.entities.len(), "entity creation rejected: {err}");
        })?;

        if id.slot() >= self.masks.len() {
            self.masks.resize(id.slot() + 1, Mask::EMPTY);
        }
        debug_assert!(self.masks[id.slot()].is_empty());

        trace!(entity = id.index(), "created entity");
        Ok(id)
    }

    /// Creates an entity and attaches every component in `bundle`.
    ///
    /// # Panics
    ///
    /// Panics like [`create`](Self::create) and [`add`](Self::add).
    pub fn spawn<B: Bundle>(&mut self, bundle: B) -> EntityId {
        let id = self.create();
        bundle.insert_into(self, id);
        id
    }

    /// Destroys an entity, dropping every component it holds.
    ///
    /// Returns `false` and does nothing if the entity is not alive.
    pub fn destroy(&mut self, id: EntityId) -> bool {
        if !self.entities.is_alive(id) {
            return false;
        }

        let mask = std::mem::replace(&mut self.masks[id.slot()], Mask::EMPTY);
        for bit in &mask {
            self.stores[bit.index()].erase(id);
        }
        self.entities.destroy(id);

        trace!(entity = id.index(), components = mask.count(), "destroyed entity");
        true
    }

    /// Returns true if `id` is alive.
    #[must_use]
    pub fn is_alive(&self, id: EntityId) -> bool {
        self.entities.is_alive(id)
    }

    /// Number of live entities.
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Highest id ever allocated, alive or not. `None` before the first
    /// create.
    #[must_use]
    pub fn max_id(&self) -> Option<EntityId> {
        self.entities.max_id()
    }

    /// One past [`max_id`](Self::max_id); the exclusive bound for scans.
    #[must_use]
    pub fn id_bound(&self) -> u32 {
        self.entities.id_bound()
    }

    // ========================================================================
    // Component access
    // ========================================================================

    /// Attaches `value` to `id`, returning the value it replaced.
    ///
    /// # Panics
    ///
    /// Panics if `T` is not registered or `id` is not alive. Use
    /// [`try_add`](Self::try_add) when either can legitimately happen.
    pub fn add<T: Component>(&mut self, id: EntityId, value: T) -> Option<T> {
        match self.try_add(id, value) {
            Ok(previous) => previous,
            Err(err) => panic!("cannot add {} to {id}: {err}", type_name::<T>()),
        }
    }

    /// Attaches `value` to `id`, returning the value it replaced.
    ///
    /// # Errors
    ///
    /// Returns an error if `T` is not registered or `id` is not alive. The
    /// value is dropped in either case.
    pub fn try_add<T: Component>(&mut self, id: EntityId, value: T) -> Result<Option<T>> {
        let bit = self.try_bit::<T>()?;
        if !self.entities.is_alive(id) {
            return Err(Error::not_alive(id).with_context(type_name::<T>()));
        }

        self.masks[id.slot()].set(bit);
        Ok(self.typed_mut::<T>(bit).insert(id, value))
    }

    /// Attaches every component in `bundle` to `id`.
    ///
    /// # Panics
    ///
    /// Panics like [`add`](Self::add).
    pub fn add_all<B: Bundle>(&mut self, id: EntityId, bundle: B) {
        bundle.insert_into(self, id);
    }

    /// Detaches `T` from `id`, returning it. `None` if it was absent.
    ///
    /// # Panics
    ///
    /// Panics if `T` is not registered.
    pub fn remove<T: Component>(&mut self, id: EntityId) -> Option<T> {
        let bit = self.bit::<T>();
        let mask = self.masks.get_mut(id.slot())?;
        if !mask.test(bit) {
            return None;
        }
        mask.clear(bit);
        self.typed_mut::<T>(bit).remove(id)
    }

    /// Returns the `T` attached to `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` has no `T`. Check with [`has`](Self::has) or use
    /// [`try_get`](Self::try_get) when absence is expected.
    #[must_use]
    pub fn get<T: Component>(&self, id: EntityId) -> &T {
        match self.try_get(id) {
            Some(value) => value,
            None => panic!("{id} has no {}", type_name::<T>()),
        }
    }

    /// Returns the `T` attached to `id` mutably.
    ///
    /// # Panics
    ///
    /// Panics if `id` has no `T`.
    pub fn get_mut<T: Component>(&mut self, id: EntityId) -> &mut T {
        match self.try_get_mut(id) {
            Some(value) => value,
            None => panic!("{id} has no {}", type_name::<T>()),
        }
    }

    /// Returns the `T` attached to `id`, if any.
    #[must_use]
    pub fn try_get<T: Component>(&self, id: EntityId) -> Option<&T> {
        let bit = self.registry.bit::<T>()?;
        self.typed::<T>(bit).get(id)
    }

    /// Returns the `T` attached to `id` mutably, if any.
    pub fn try_get_mut<T: Component>(&mut self, id: EntityId) -> Option<&mut T> {
        let bit = self.registry.bit::<T>()?;
        self.typed_mut::<T>(bit).get_mut(id)
    }

    /// Returns true if `id` has a `T`.
    #[must_use]
    pub fn has<T: Component>(&self, id: EntityId) -> bool {
        self.registry
            .bit::<T>()
            .is_some_and(|bit| self.masks.get(id.slot()).is_some_and(|mask| mask.test(bit)))
    }

    /// Removes every component from `id`, leaving it alive.
    ///
    /// Returns the number of components removed.
    pub fn clear_components(&mut self, id: EntityId) -> usize {
        let Some(mask) = self.masks.get(id.slot()).copied() else {
            return 0;
        };
        self.remove_bits(id, &mask)
    }

    /// Removes the components named by `bits` from `id`.
    ///
    /// Bits the entity does not hold are ignored. Returns the number of
    /// components removed.
    pub fn remove_bits(&mut self, id: EntityId, bits: &Mask) -> usize {
        let Some(mask) = self.masks.get_mut(id.slot()) else {
            return 0;
        };
        let held = *mask;
        *mask = held.difference(bits);

        let mut removed = 0;
        for bit in bits.iter().filter(|bit| held.test(*bit)) {
            self.stores[bit.index()].erase(id);
            removed += 1;
        }
        removed
    }

    /// Read-only view of the store for `T`, for bulk iteration.
    ///
    /// # Panics
    ///
    /// Panics if `T` is not registered.
    #[must_use]
    pub fn store<T: Component>(&self) -> &T::Storage {
        self.typed::<T>(self.bit::<T>())
    }

    // ========================================================================
    // Masks and bits
    // ========================================================================

    /// The component mask of `id`. Empty for dead ids.
    ///
    /// # Panics
    ///
    /// Panics if `id` is beyond [`max_id`](Self::max_id).
    #[must_use]
    pub fn mask(&self, id: EntityId) -> &Mask {
        match self.masks.get(id.slot()) {
            Some(mask) => mask,
            None => panic!("{id} is beyond the highest allocated id"),
        }
    }

    /// The bit assigned to `T`.
    ///
    /// # Panics
    ///
    /// Panics if `T` is not registered.
    #[must_use]
    pub fn bit<T: 'static>(&self) -> ComponentBit {
        match self.registry.bit::<T>() {
            Some(bit) => bit,
            None => panic!("component not registered: {}", type_name::<T>()),
        }
    }

    /// The bit assigned to `T`.
    ///
    /// # Errors
    ///
    /// Returns an error if `T` is not registered.
    pub fn try_bit<T: 'static>(&self) -> Result<ComponentBit> {
        self.registry.try_bit::<T>()
    }

    /// The mask covering every component type in `B`.
    ///
    /// # Panics
    ///
    /// Panics if any type in `B` is not registered.
    #[must_use]
    pub fn mask_of<B: Bundle>(&self) -> Mask {
        match self.registry.mask_of::<B>() {
            Ok(mask) => mask,
            Err(err) => panic!("{err}"),
        }
    }

    /// The component registry.
    #[must_use]
    pub fn registry(&self) -> &ComponentRegistry {
        &self.registry
    }

    /// The configuration the world was built with.
    #[must_use]
    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    // ========================================================================
    // Scans
    // ========================================================================

    /// Every id in `0..id_bound`, alive or not, captured now.
    ///
    /// The iterator does not borrow the world, so the loop body may mutate
    /// it. Test [`matches`](Self::matches) per id.
    #[must_use]
    pub fn ids(&self) -> EntityIds {
        EntityIds::new(self.entities.id_bound())
    }

    /// Returns true if `id`'s mask contains `required`.
    ///
    /// An empty `required` matches every live entity.
    #[must_use]
    pub fn matches(&self, id: EntityId, required: &Mask) -> bool {
        self.masks
            .get(id.slot())
            .is_some_and(|mask| mask_matches(mask, required, || self.entities.is_alive(id)))
    }

    /// Ids whose mask contains `required`, in ascending order.
    #[must_use]
    pub fn query(&self, required: &Mask) -> Query<'_> {
        Query::new(&self.masks, &self.entities, *required)
    }

    /// Collects [`query`](Self::query) into a vector.
    #[must_use]
    pub fn collect_matching(&self, required: &Mask) -> Vec<EntityId> {
        self.query(required).collect()
    }

    // ========================================================================
    // Deferred commands and frame barrier
    // ========================================================================

    /// Queues a command for the next [`step`](Self::step).
    ///
    /// A command with a [`target`](Command::target) only runs if that entity
    /// has not been destroyed in the meantime. A reused id counts as a
    /// different entity.
    pub fn defer(&mut self, command: Command) {
        let generation = command
            .target()
            .and_then(|id| self.entities.generation(id));
        self.commands.push_back(Queued {
            command,
            generation,
        });
    }

    /// Queues destruction of `id`.
    pub fn defer_destroy(&mut self, id: EntityId) {
        self.defer(Command::Destroy(id));
    }

    /// Queues removal of `T` from `id`.
    ///
    /// # Panics
    ///
    /// Panics if `T` is not registered.
    pub fn defer_remove<T: Component>(&mut self, id: EntityId) {
        let bit = self.bit::<T>();
        self.defer(Command::Remove { entity: id, bit });
    }

    /// Queues attaching `value` to `id`.
    ///
    /// Skipped if `id` has been destroyed by the time the command runs, even
    /// if the id now belongs to a new entity.
    pub fn defer_add<T: Component>(&mut self, id: EntityId, value: T) {
        let generation = self.entities.generation(id);
        self.defer(Command::apply(move |world| {
            if world.entities.generation(id) != generation {
                debug!(
                    entity = id.index(),
                    component = type_name::<T>(),
                    "skipped deferred add to replaced entity"
                );
                return;
            }
            if let Err(err) = world.try_add(id, value) {
                debug!(entity = id.index(), "skipped deferred add: {err}");
            }
        }));
    }

    /// Queues creating an entity with `bundle` attached.
    ///
    /// If the world has a fixed capacity that is exhausted when the command
    /// runs, nothing is spawned and the rejection is logged; later commands
    /// still run.
    pub fn defer_spawn<B: Bundle>(&mut self, bundle: B) {
        self.defer(Command::apply(move |world| match world.try_create() {
            Ok(id) => bundle.insert_into(world, id),
            Err(err) => {
                debug!(bundle = type_name::<B>(), "skipped deferred spawn: {err}");
            }
        }));
    }

    /// Number of queued commands.
    #[must_use]
    pub fn pending_commands(&self) -> usize {
        self.commands.len()
    }

    /// Frame counter, incremented by every [`step`](Self::step).
    #[must_use]
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Frame barrier: applies queued commands in order, then advances the
    /// frame counter.
    ///
    /// Commands queued while applying run in this same barrier. Commands
    /// whose target was destroyed after queueing are skipped.
    pub fn step(&mut self) -> StepReport {
        let mut applied = 0;
        let mut skipped = 0;
        while let Some(Queued {
            command,
            generation,
        }) = self.commands.pop_front()
        {
            let stale = command
                .target()
                .is_some_and(|id| self.entities.generation(id) != generation);
            if stale {
                trace!(?command, "skipped command for replaced entity");
                skipped += 1;
            } else {
                self.apply(command);
                applied += 1;
            }
        }
        self.frame += 1;

        debug!(
            frame = self.frame,
            applied,
            skipped,
            live = self.entities.len(),
            "stepped world"
        );
        StepReport {
            frame: self.frame,
            applied,
            skipped,
        }
    }

    /// Destroys every entity carrying marker `M`. Returns how many.
    ///
    /// This is the sweep half of mark-then-sweep: a scan tags entities with
    /// `M` instead of destroying them mid-iteration, then sweeps afterwards.
    ///
    /// # Panics
    ///
    /// Panics if `M` is not registered.
    pub fn sweep<M: Component>(&mut self) -> usize {
        let bit = self.bit::<M>();
        let mut swept = 0;
        for id in self.ids() {
            if self.masks[id.slot()].test(bit) && self.destroy(id) {
                swept += 1;
            }
        }
        trace!(component = type_name::<M>(), swept, "swept marked entities");
        swept
    }

    fn apply(&mut self, command: Command) {
        match command {
            Command::Destroy(id) => {
                self.destroy(id);
            }
            Command::ClearComponents(id) => {
                self.clear_components(id);
            }
            Command::Remove { entity, bit } => {
                self.remove_bits(entity, &Mask::new().with(bit));
            }
            Command::Apply(f) => f(self),
        }
    }

    // ========================================================================
    // Invariants
    // ========================================================================

    /// Checks that masks, stores, and liveness agree.
    ///
    /// Verifies that dead ids have empty masks, that each mask bit is set
    /// exactly when the matching store holds a value, and that each store's
    /// length equals the number of masks carrying its bit. Costs
    /// O(`id_bound` x components); meant for tests and debug assertions.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        if self.masks.len() != self.entities.id_bound() as usize {
            return false;
        }

        let mut per_bit = vec![0usize; self.stores.len()];
        for id in self.ids() {
            let mask = &self.masks[id.slot()];
            if !self.entities.is_alive(id) && !mask.is_empty() {
                return false;
            }
            for (index, store) in self.stores.iter().enumerate() {
                let bit = ComponentBit::new(index);
                if mask.test(bit) != store.holds(id) {
                    return false;
                }
                if mask.test(bit) {
                    per_bit[index] += 1;
                }
            }
        }

        self.stores
            .iter()
            .zip(&per_bit)
            .all(|(store, &count)| store.live_count() == count)
    }

    fn typed<T: Component>(&self, bit: ComponentBit) -> &T::Storage {
        match self.stores[bit.index()]
            .as_any()
            .downcast_ref::<TypedStore<T>>()
        {
            Some(store) => &store.inner,
            None => unreachable!("store for bit {} does not hold {}", bit.index(), type_name::<T>()),
        }
    }

    fn typed_mut<T: Component>(&mut self, bit: ComponentBit) -> &mut T::Storage {
        match self.stores[bit.index()]
            .as_any_mut()
            .downcast_mut::<TypedStore<T>>()
        {
            Some(store) => &mut store.inner,
            None => unreachable!("store for bit {} does not hold {}", bit.index(), type_name::<T>()),
        }
    }
}

impl fmt::Debug for World {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("World")
            .field("frame", &self.frame)
            .field("entities", &self.entities.len())
            .field("id_bound", &self.entities.id_bound())
            .field("components", &self.registry.len())
            .field("pending_commands", &self.commands.len())
            .finish_non_exhaustive()
    }
}
