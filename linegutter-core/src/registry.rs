use crate::error::{GutterError, Result};
use crate::host::Host;
use crate::raster::Raster;
use crate::render::RenderEngine;
use crate::scheduler::DeferredRender;
use std::collections::HashMap;

/// Identity of a host node, assigned by the platform binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeKey(pub u32);

/// Index of a managed instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstanceId(pub u32);

/// One managed host: its render engine plus its debounce slot.
pub struct Instance<H: Host, R: Raster> {
    pub node: NodeKey,
    pub engine: RenderEngine<H, R>,
    pub render: DeferredRender,
}

/// Maps host nodes to their instance. A node maps to at most one instance.
pub struct Registry<H: Host, R: Raster> {
    instances: Vec<Option<Instance<H, R>>>,
    by_node: HashMap<NodeKey, InstanceId>,
    free_list: Vec<u32>,
}

impl<H: Host, R: Raster> Registry<H, R> {
    pub fn new() -> Self {
        Self {
            instances: Vec::new(),
            by_node: HashMap::new(),
            free_list: Vec::new(),
        }
    }

    pub fn insert(&mut self, node: NodeKey, engine: RenderEngine<H, R>) -> Result<InstanceId> {
        if self.by_node.contains_key(&node) {
            return Err(GutterError::AlreadyAttached(node));
        }

        let instance = Instance {
            node,
            engine,
            render: DeferredRender::new(),
        };
        let index = match self.free_list.pop() {
            Some(idx) => {
                self.instances[idx as usize] = Some(instance);
                idx
            }
            None => {
                self.instances.push(Some(instance));
                (self.instances.len() - 1) as u32
            }
        };

        let id = InstanceId(index);
        self.by_node.insert(node, id);
        Ok(id)
    }

    pub fn remove(&mut self, node: NodeKey) -> Option<Instance<H, R>> {
        let id = self.by_node.remove(&node)?;
        let instance = self.instances.get_mut(id.0 as usize)?.take();
        self.free_list.push(id.0);
        instance
    }

    pub fn lookup(&self, node: NodeKey) -> Option<InstanceId> {
        self.by_node.get(&node).copied()
    }

    pub fn get(&self, id: InstanceId) -> Option<&Instance<H, R>> {
        self.instances.get(id.0 as usize)?.as_ref()
    }

    pub fn get_mut(&mut self, id: InstanceId) -> Option<&mut Instance<H, R>> {
        self.instances.get_mut(id.0 as usize)?.as_mut()
    }

    pub fn nodes(&self) -> impl Iterator<Item = NodeKey> + '_ {
        self.by_node.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.by_node.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_node.is_empty()
    }
}

impl<H: Host, R: Raster> Default for Registry<H, R> {
    fn default() -> Self {
        Self::new()
    }
}
