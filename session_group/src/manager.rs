use crate::error::{manager_error, Error, ErrorKind};
use crate::group::Group;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use log::*;
use serde_json::Value;
use std::sync::Arc;

/// Registry of named groups, shared across request handlers.
pub struct Manager {
    groups: DashMap<String, Arc<Group>>,
}

impl Manager {
    pub fn new() -> Self {
        Self {
            groups: DashMap::new(),
        }
    }

    /// Create a group under a name that is not yet taken.
    pub fn create(&self, name: &str) -> Result<Arc<Group>, Error> {
        match self.groups.entry(name.to_string()) {
            Entry::Occupied(_) => Err(manager_error(ErrorKind::DuplicateGroup, name)),
            Entry::Vacant(slot) => {
                let group = Arc::new(Group::new(name));
                slot.insert(Arc::clone(&group));
                info!("Created group [{}]", name);
                Ok(group)
            }
        }
    }

    pub fn get_or_create(&self, name: &str) -> Arc<Group> {
        let group = self
            .groups
            .entry(name.to_string())
            .or_insert_with(|| {
                info!("Created group [{}]", name);
                Arc::new(Group::new(name))
            });
        Arc::clone(group.value())
    }

    pub fn get(&self, name: &str) -> Result<Arc<Group>, Error> {
        self.groups
            .get(name)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| manager_error(ErrorKind::GroupNotFound, name))
    }

    /// Unregister and close a group. Holders of the group's `Arc` see
    /// `GroupClosed` from then on.
    pub fn remove(&self, name: &str) -> Result<(), Error> {
        let (_, group) = self
            .groups
            .remove(name)
            .ok_or_else(|| manager_error(ErrorKind::GroupNotFound, name))?;

        // Already closed by a direct holder; removal still succeeds.
        match group.close() {
            Ok(()) => {}
            Err(e) if e.is_group_closed() => {
                debug!("Group [{}] was closed before removal", name);
            }
            Err(e) => return Err(e),
        }
        info!("Removed group [{}]", name);
        Ok(())
    }

    pub fn names(&self) -> Vec<String> {
        self.groups.iter().map(|entry| entry.key().clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Broadcast to every registered group, skipping groups closed by a holder.
    pub fn broadcast_all(&self, route: &str, payload: &Value) {
        let groups: Vec<Arc<Group>> = self
            .groups
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect();

        for group in groups {
            match group.broadcast(route, payload) {
                Ok(()) => {}
                Err(e) if e.is_group_closed() => {
                    debug!("Skipping closed group [{}] during broadcast", group.name());
                }
                Err(e) => warn!("Broadcast to group [{}] failed: {}", group.name(), e),
            }
        }
    }
}

impl Default for Manager {
    fn default() -> Self {
        Self::new()
    }
}
