use std::collections::{BTreeMap, BTreeSet};
use std::sync::Mutex;

use crate::cluster::Cluster;
use crate::error::ApiError;
use crate::resources::{Manifest, ResourceKind};

/// A request made to the fake cluster.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Call {
    Create(ResourceKind, String),
    List(ResourceKind, String),
    Delete(ResourceKind, String),
}

type Key = (ResourceKind, String, String);

/// An in-memory cluster which records every request.
#[derive(Debug, Default)]
pub struct FakeCluster {
    objects: Mutex<BTreeMap<Key, BTreeMap<String, String>>>,
    calls: Mutex<Vec<Call>>,
    broken: BTreeSet<ResourceKind>,
}

impl FakeCluster {
    /// Requests for these kinds fail with an unexpected error.
    pub fn with_broken(mut self, kind: ResourceKind) -> Self {
        self.broken.insert(kind);
        self
    }

    /// Add an object directly, without recording a call.
    pub fn insert(&self, kind: ResourceKind, namespace: &str, name: &str, labels: &BTreeMap<String, String>) {
        self.objects
            .lock()
            .unwrap()
            .insert(key(kind, namespace, name), labels.clone());
    }

    pub fn contains(&self, kind: ResourceKind, namespace: &str, name: &str) -> bool {
        self.objects
            .lock()
            .unwrap()
            .contains_key(&key(kind, namespace, name))
    }

    pub fn len(&self) -> usize {
        self.objects.lock().unwrap().len()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn creates(&self) -> Vec<ResourceKind> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Create(kind, _) => Some(kind),
                _ => None,
            })
            .collect()
    }

    pub fn deletes(&self) -> Vec<ResourceKind> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Delete(kind, _) => Some(kind),
                _ => None,
            })
            .collect()
    }

    fn check_broken(&self, kind: ResourceKind) -> Result<(), ApiError> {
        if self.broken.contains(&kind) {
            Err(ApiError::Other(format!("{kind} is broken")))
        } else {
            Ok(())
        }
    }
}

impl Cluster for FakeCluster {
    async fn create(&self, manifest: &Manifest) -> Result<(), ApiError> {
        let kind = manifest.kind();
        self.calls
            .lock()
            .unwrap()
            .push(Call::Create(kind, manifest.qualified_name()));
        self.check_broken(kind)?;

        let value = serde_json::to_value(manifest).map_err(|e| ApiError::Other(e.to_string()))?;
        let labels: BTreeMap<String, String> =
            serde_json::from_value(value["metadata"]["labels"].clone()).unwrap_or_default();

        let mut objects = self.objects.lock().unwrap();
        let key = key(kind, &manifest.namespace().unwrap_or_default(), &manifest.name());
        if objects.contains_key(&key) {
            return Err(ApiError::AlreadyExists);
        }
        objects.insert(key, labels);
        Ok(())
    }

    async fn list(
        &self,
        kind: ResourceKind,
        namespace: &str,
        label_selector: &str,
    ) -> Result<Vec<String>, ApiError> {
        self.calls
            .lock()
            .unwrap()
            .push(Call::List(kind, label_selector.to_string()));
        self.check_broken(kind)?;

        let wanted: Vec<(&str, &str)> = label_selector
            .split(',')
            .filter_map(|kv| kv.split_once('='))
            .collect();
        let namespace = if kind.is_namespaced() { namespace } else { "" };

        let objects = self.objects.lock().unwrap();
        Ok(objects
            .iter()
            .filter(|((k, ns, _), labels)| {
                *k == kind
                    && ns == namespace
                    && wanted
                        .iter()
                        .all(|(lk, lv)| labels.get(*lk).map(String::as_str) == Some(*lv))
            })
            .map(|((_, _, name), _)| name.clone())
            .collect())
    }

    async fn delete(
        &self,
        kind: ResourceKind,
        namespace: &str,
        name: &str,
    ) -> Result<(), ApiError> {
        self.calls
            .lock()
            .unwrap()
            .push(Call::Delete(kind, kind.qualified_name(namespace, name)));
        self.check_broken(kind)?;

        match self.objects.lock().unwrap().remove(&key(kind, namespace, name)) {
            Some(_) => Ok(()),
            None => Err(ApiError::NotFound),
        }
    }
}

fn key(kind: ResourceKind, namespace: &str, name: &str) -> Key {
    let namespace = if kind.is_namespaced() { namespace } else { "" };
    (kind, namespace.to_string(), name.to_string())
}
