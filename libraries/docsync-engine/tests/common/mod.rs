//! Common test utilities: an in-memory document store

#![allow(dead_code)]

use async_trait::async_trait;
use docsync_core::{
    CreatedFile, DocumentStore, FolderRef, Item, ItemId, ItemType, Member, ResourceKind, Result,
    Role, StoreError, User,
};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

#[derive(Debug, Clone)]
struct Node {
    name: String,
    item_type: ItemType,
    data: Vec<u8>,
    version: u32,
    children: Vec<ItemId>,
}

#[derive(Default)]
struct State {
    nodes: HashMap<ItemId, Node>,
    next_id: usize,
    resources: HashMap<(ResourceKind, String), ItemId>,
    users: Vec<User>,
    members: HashMap<ItemId, Vec<Member>>,
    failing_reads: HashSet<ItemId>,
    reads_denied: bool,
    failing_folders: HashSet<String>,
    created_folders: Vec<String>,
    deleted: Vec<ItemId>,
    grants: Vec<(String, Role, bool)>,
    revokes: Vec<String>,
}

/// In-memory document store that records what it was asked to do
pub struct MemoryStore {
    state: Mutex<State>,
    calls: AtomicUsize,
    reads_in_flight: AtomicUsize,
    max_reads_in_flight: AtomicUsize,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        let mut state = State::default();
        state.nodes.insert(ItemId::home(), folder_node("Home"));
        Self {
            state: Mutex::new(state),
            calls: AtomicUsize::new(0),
            reads_in_flight: AtomicUsize::new(0),
            max_reads_in_flight: AtomicUsize::new(0),
        }
    }

    // ========================================================================
    // Fixtures
    // ========================================================================

    pub fn add_folder(&self, parent: &ItemId, name: &str) -> ItemId {
        let mut state = self.state.lock().unwrap();
        insert(&mut state, parent, folder_node(name))
    }

    pub fn add_file(&self, parent: &ItemId, name: &str, data: &[u8]) -> ItemId {
        let mut state = self.state.lock().unwrap();
        insert(
            &mut state,
            parent,
            Node {
                name: name.to_string(),
                item_type: ItemType::File,
                data: data.to_vec(),
                version: 1,
                children: Vec::new(),
            },
        )
    }

    /// Add an item of a type docsync does not transfer
    pub fn add_other(&self, parent: &ItemId, name: &str, kind: &str) -> ItemId {
        let mut state = self.state.lock().unwrap();
        insert(
            &mut state,
            parent,
            Node {
                name: name.to_string(),
                item_type: ItemType::Other(kind.to_string()),
                data: Vec::new(),
                version: 1,
                children: Vec::new(),
            },
        )
    }

    /// Register a site, theme or component and return its root folder id
    pub fn add_resource(&self, kind: ResourceKind, name: &str) -> ItemId {
        let mut state = self.state.lock().unwrap();
        state.next_id += 1;
        let id = ItemId::new(format!("R{:04}", state.next_id));
        state.nodes.insert(id.clone(), folder_node(name));
        state.resources.insert((kind, name.to_string()), id.clone());
        id
    }

    pub fn add_user(&self, login: &str) -> User {
        let mut state = self.state.lock().unwrap();
        let user = User {
            id: format!("U{}", state.users.len() + 1),
            login_name: login.to_string(),
            display_name: Some(login.to_uppercase()),
        };
        state.users.push(user.clone());
        user
    }

    pub fn add_member(&self, folder: &ItemId, user: &User, role: Role) {
        let mut state = self.state.lock().unwrap();
        state.members.entry(folder.clone()).or_default().push(Member {
            user: user.clone(),
            role: Some(role),
        });
    }

    pub fn fail_reads_of(&self, id: &ItemId) {
        self.state.lock().unwrap().failing_reads.insert(id.clone());
    }

    /// Every read fails as if the session had expired
    pub fn deny_reads(&self) {
        self.state.lock().unwrap().reads_denied = true;
    }

    /// Creating a folder with this name fails
    pub fn fail_folder_creation(&self, name: &str) {
        self.state
            .lock()
            .unwrap()
            .failing_folders
            .insert(name.to_string());
    }

    // ========================================================================
    // Inspection
    // ========================================================================

    /// Number of store calls made so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Names of the folders created through the store, in creation order
    pub fn created_folders(&self) -> Vec<String> {
        self.state.lock().unwrap().created_folders.clone()
    }

    pub fn max_concurrent_reads(&self) -> usize {
        self.max_reads_in_flight.load(Ordering::SeqCst)
    }

    pub fn deleted(&self) -> Vec<ItemId> {
        self.state.lock().unwrap().deleted.clone()
    }

    /// `(user id, role, new member)` for every grant
    pub fn grants(&self) -> Vec<(String, Role, bool)> {
        self.state.lock().unwrap().grants.clone()
    }

    pub fn revokes(&self) -> Vec<String> {
        self.state.lock().unwrap().revokes.clone()
    }

    /// Id of the item at `path` below `root`
    pub fn lookup(&self, root: &ItemId, path: &[&str]) -> Option<ItemId> {
        let state = self.state.lock().unwrap();
        let mut current = root.clone();
        for name in path {
            let node = state.nodes.get(&current)?;
            current = node
                .children
                .iter()
                .find(|id| state.nodes[*id].name == *name)?
                .clone();
        }
        Some(current)
    }

    pub fn children_of(&self, folder: &ItemId) -> Vec<String> {
        let state = self.state.lock().unwrap();
        state.nodes[folder]
            .children
            .iter()
            .map(|id| state.nodes[id].name.clone())
            .collect()
    }

    pub fn data_of(&self, id: &ItemId) -> Vec<u8> {
        self.state.lock().unwrap().nodes[id].data.clone()
    }

    pub fn version_of(&self, id: &ItemId) -> u32 {
        self.state.lock().unwrap().nodes[id].version
    }

    fn count(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

fn folder_node(name: &str) -> Node {
    Node {
        name: name.to_string(),
        item_type: ItemType::Folder,
        data: Vec::new(),
        version: 1,
        children: Vec::new(),
    }
}

fn insert(state: &mut State, parent: &ItemId, node: Node) -> ItemId {
    state.next_id += 1;
    let prefix = if node.item_type == ItemType::File { "D" } else { "F" };
    let id = ItemId::new(format!("{}{:04}", prefix, state.next_id));
    state
        .nodes
        .get_mut(parent)
        .expect("parent exists")
        .children
        .push(id.clone());
    state.nodes.insert(id.clone(), node);
    id
}

fn child_named(state: &State, parent: &ItemId, name: &str, item_type: &ItemType) -> Option<ItemId> {
    state.nodes.get(parent)?.children.iter().find_map(|id| {
        let node = &state.nodes[id];
        (node.name == name && &node.item_type == item_type).then(|| id.clone())
    })
}

fn not_found(entity: &str, id: &ItemId) -> StoreError {
    StoreError::not_found(entity, id.as_str())
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn find_or_create_folder(&self, parent: &ItemId, name: &str) -> Result<FolderRef> {
        self.count();
        let mut state = self.state.lock().unwrap();
        if !state.nodes.contains_key(parent) {
            return Err(not_found("folder", parent));
        }
        if let Some(id) = child_named(&state, parent, name, &ItemType::Folder) {
            return Ok(FolderRef::found(id, name));
        }
        if state.failing_folders.contains(name) {
            return Err(StoreError::Status {
                status: 500,
                message: format!("cannot create {}", name),
            });
        }
        let id = insert(&mut state, parent, folder_node(name));
        state.created_folders.push(name.to_string());
        Ok(FolderRef::created(id, name))
    }

    async fn find_item(
        &self,
        parent: &ItemId,
        name: &str,
        item_type: ItemType,
    ) -> Result<Option<Item>> {
        self.count();
        let state = self.state.lock().unwrap();
        if !state.nodes.contains_key(parent) {
            return Err(not_found("folder", parent));
        }
        Ok(child_named(&state, parent, name, &item_type).map(|id| Item {
            id,
            name: name.to_string(),
            item_type,
        }))
    }

    async fn list_children(&self, parent: &ItemId, _limit: usize) -> Result<Vec<Item>> {
        self.count();
        let state = self.state.lock().unwrap();
        let node = state
            .nodes
            .get(parent)
            .ok_or_else(|| not_found("folder", parent))?;
        Ok(node
            .children
            .iter()
            .map(|id| {
                let child = &state.nodes[id];
                Item {
                    id: id.clone(),
                    name: child.name.clone(),
                    item_type: child.item_type.clone(),
                }
            })
            .collect())
    }

    async fn delete_folder(&self, id: &ItemId) -> Result<()> {
        self.count();
        let mut state = self.state.lock().unwrap();
        if state.nodes.remove(id).is_none() {
            return Err(not_found("folder", id));
        }
        for node in state.nodes.values_mut() {
            node.children.retain(|child| child != id);
        }
        state.deleted.push(id.clone());
        Ok(())
    }

    async fn read_file_data(&self, id: &ItemId) -> Result<Vec<u8>> {
        self.count();
        let in_flight = self.reads_in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_reads_in_flight.fetch_max(in_flight, Ordering::SeqCst);

        tokio::time::sleep(Duration::from_millis(2)).await;

        self.reads_in_flight.fetch_sub(1, Ordering::SeqCst);
        let state = self.state.lock().unwrap();
        if state.reads_denied {
            return Err(StoreError::AuthFailed("session expired".to_string()));
        }
        if state.failing_reads.contains(id) {
            return Err(StoreError::Status {
                status: 500,
                message: "read failed".to_string(),
            });
        }
        state
            .nodes
            .get(id)
            .map(|node| node.data.clone())
            .ok_or_else(|| not_found("file", id))
    }

    async fn create_file(&self, parent: &ItemId, name: &str, contents: Vec<u8>) -> Result<CreatedFile> {
        self.count();
        let mut state = self.state.lock().unwrap();
        if !state.nodes.contains_key(parent) {
            return Err(not_found("folder", parent));
        }

        let id = match child_named(&state, parent, name, &ItemType::File) {
            Some(id) => {
                let node = state.nodes.get_mut(&id).expect("child exists");
                node.data = contents;
                node.version += 1;
                id
            }
            None => insert(
                &mut state,
                parent,
                Node {
                    name: name.to_string(),
                    item_type: ItemType::File,
                    data: contents,
                    version: 1,
                    children: Vec::new(),
                },
            ),
        };

        let version = state.nodes[&id].version.to_string();
        Ok(CreatedFile {
            id,
            name: name.to_string(),
            version,
        })
    }

    async fn get_resource_id(&self, kind: ResourceKind, name: &str) -> Result<Option<ItemId>> {
        self.count();
        let state = self.state.lock().unwrap();
        Ok(state.resources.get(&(kind, name.to_string())).cloned())
    }

    async fn get_users_by_name(&self, name: &str) -> Result<Vec<User>> {
        self.count();
        let needle = name.to_lowercase();
        let state = self.state.lock().unwrap();
        Ok(state
            .users
            .iter()
            .filter(|user| user.login_name.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }

    async fn list_folder_members(&self, folder: &ItemId) -> Result<Vec<Member>> {
        self.count();
        let state = self.state.lock().unwrap();
        Ok(state.members.get(folder).cloned().unwrap_or_default())
    }

    async fn grant_access(
        &self,
        folder: &ItemId,
        user: &User,
        role: Role,
        new_member: bool,
    ) -> Result<()> {
        self.count();
        let mut state = self.state.lock().unwrap();
        state.grants.push((user.id.clone(), role, new_member));
        let members = state.members.entry(folder.clone()).or_default();
        match members.iter_mut().find(|m| m.user.id == user.id) {
            Some(member) => member.role = Some(role),
            None => members.push(Member {
                user: user.clone(),
                role: Some(role),
            }),
        }
        Ok(())
    }

    async fn revoke_access(&self, folder: &ItemId, user: &User) -> Result<()> {
        self.count();
        let mut state = self.state.lock().unwrap();
        state.revokes.push(user.id.clone());
        if let Some(members) = state.members.get_mut(folder) {
            members.retain(|m| m.user.id != user.id);
        }
        Ok(())
    }
}
