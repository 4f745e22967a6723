//! Shared test utilities for integration tests
//!
//! [`FakeCloud`] is an in-memory stand-in for every AWS service teardown
//! talks to. It keeps enough state to notice ordering mistakes: a stack
//! delete fails if its buckets still hold versions, its workgroups still
//! exist or its cluster is still protected, and a protected stack refuses
//! the delete outright.

#![allow(dead_code)]

use anyhow::Result;
use sf_teardown::aws::{
    AwsError, BucketOperations, CloudApi, ClusterOperations, DashboardOperations, FlowOperations,
    LogGroupOperations, ObjectVersionPage, ObjectVersionRecord, StackDescriptor,
    StackMemberResource, StackOperations, VersionCursor, WorkgroupOperations,
};
use sf_teardown::teardown::{TeardownEvent, TeardownReporter};
use sf_teardown_common::naming::{cluster_log_group, dashboard_id, function_log_group};
use sf_teardown_common::{InstallationId, MemberKind, StackRole};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

pub fn id(s: &str) -> InstallationId {
    InstallationId::new(s).unwrap()
}

fn not_found(resource_type: &'static str, resource_id: &str) -> anyhow::Error {
    AwsError::NotFound {
        resource_type,
        resource_id: resource_id.to_string(),
    }
    .into()
}

fn name_resolution(host: &str) -> anyhow::Error {
    AwsError::NameResolution {
        message: format!("dns error: failed to lookup address information for {host}"),
    }
    .into()
}

fn denied(message: &str) -> anyhow::Error {
    AwsError::Sdk {
        code: Some("AccessDenied".to_string()),
        message: message.to_string(),
    }
    .into()
}

struct FakeStack {
    descriptor: StackDescriptor,
    resources: Vec<StackMemberResource>,
    termination_protected: bool,
    /// Statuses handed out by successive describes after the delete request
    pending: Option<VecDeque<String>>,
}

#[derive(Default)]
struct World {
    stacks: Vec<FakeStack>,
    scripted: HashMap<String, Vec<String>>,
    buckets: BTreeMap<String, Vec<ObjectVersionRecord>>,
    workgroups: BTreeSet<String>,
    clusters: HashMap<String, bool>,
    log_groups: BTreeSet<String>,
    dashboards: BTreeSet<String>,
    flows: BTreeSet<String>,
    page_size: usize,
    transient_failures: HashMap<String, usize>,
    permanent_failures: HashSet<String>,
    attempts: HashMap<String, usize>,
    calls: Vec<String>,
    next_stack: usize,
}

/// In-memory implementation of every operation trait
pub struct FakeCloud {
    world: Mutex<World>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl Default for FakeCloud {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeCloud {
    pub fn new() -> Self {
        Self {
            world: Mutex::new(World {
                page_size: 1000,
                ..World::default()
            }),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    /// A complete installation: five stacks with members, plus residue
    /// and look-alike decoys belonging to a neighbouring id.
    pub fn installation(id: &InstallationId) -> Self {
        let fake = Self::new();

        fake.add_stack(
            &StackRole::Flow.stack_name(id),
            &[("AWS::Lambda::Function", format!("sf-sync-{id}"))],
        );
        fake.add_stack(
            &StackRole::Query.stack_name(id),
            &[
                ("AWS::Athena::WorkGroup", format!("sf-wg-{id}")),
                ("AWS::S3::Bucket", format!("sf-results-{id}")),
            ],
        );
        fake.add_stack(
            &StackRole::DataStore.stack_name(id),
            &[
                ("AWS::RDS::DBCluster", format!("sf-cluster-{id}")),
                ("AWS::Lambda::Function", format!("sf-loader-{id}")),
            ],
        );
        fake.add_stack(
            &StackRole::Network.stack_name(id),
            &[("AWS::EC2::VPC", "vpc-0abc".to_string())],
        );
        fake.add_stack(
            &StackRole::Storage.stack_name(id),
            &[
                ("AWS::S3::Bucket", format!("sf-logging-{id}")),
                ("AWS::S3::Bucket", format!("sf-landing-{id}")),
            ],
        );

        fake.add_bucket(&format!("sf-results-{id}"), 7);
        fake.add_bucket(&format!("sf-landing-{id}"), 45);
        fake.add_bucket(&format!("sf-logging-{id}"), 3);
        fake.add_workgroup(&format!("sf-wg-{id}"));
        fake.add_cluster(&format!("sf-cluster-{id}"));

        fake.add_log_group(&function_log_group(&format!("sf-sync-{id}")));
        fake.add_log_group(&function_log_group(&format!("sf-loader-{id}")));
        fake.add_log_group(&cluster_log_group(&format!("sf-cluster-{id}")));
        fake.add_log_group(&format!("/aws/vpc/sf-flowlogs-{id}"));
        fake.add_log_group(&format!("sf-audit-{id}"));
        fake.add_log_group(&format!("/aws/vpc/sf-flowlogs-{id}4"));

        fake.add_dashboard(&dashboard_id(id));
        fake.add_flow(&format!("sf-contacts-{id}"));
        fake.add_flow(&format!("sf-contacts-{id}9"));
        fake.add_workgroup(&format!("sf-adhoc-{id}"));
        fake.add_workgroup(&format!("sf-adhoc-{id}7"));

        fake
    }

    fn world(&self) -> std::sync::MutexGuard<'_, World> {
        self.world.lock().unwrap()
    }

    pub fn add_stack(&self, name: &str, members: &[(&str, String)]) {
        let mut world = self.world();
        world.next_stack += 1;
        let descriptor = StackDescriptor {
            id: format!(
                "arn:aws:cloudformation:us-east-1:123456789012:stack/{name}/{}",
                world.next_stack
            ),
            name: name.to_string(),
            status: "CREATE_COMPLETE".to_string(),
            status_reason: None,
        };
        let resources = members
            .iter()
            .enumerate()
            .map(|(i, (resource_type, physical_id))| StackMemberResource {
                logical_id: format!("Resource{i}"),
                physical_id: Some(physical_id.to_string()),
                resource_type: resource_type.to_string(),
            })
            .collect();
        world.stacks.push(FakeStack {
            descriptor,
            resources,
            termination_protected: true,
            pending: None,
        });
    }

    /// Add a stack that exists only as a `DELETE_COMPLETE` record
    pub fn add_deleted_stack(&self, name: &str) {
        self.add_stack(name, &[]);
        let mut world = self.world();
        if let Some(stack) = world.stacks.last_mut() {
            stack.descriptor.status = "DELETE_COMPLETE".to_string();
        }
    }

    /// Statuses returned by describes after the delete request, in order.
    /// The last one repeats.
    pub fn script_statuses(&self, stack_name: &str, statuses: &[&str]) {
        self.world().scripted.insert(
            stack_name.to_string(),
            statuses.iter().map(|s| s.to_string()).collect(),
        );
    }

    pub fn add_bucket(&self, name: &str, versions: usize) {
        let records = (0..versions)
            .map(|i| ObjectVersionRecord {
                key: format!("obj-{i:04}"),
                version_id: format!("v{i}"),
            })
            .collect();
        self.world().buckets.insert(name.to_string(), records);
    }

    pub fn set_page_size(&self, page_size: usize) {
        self.world().page_size = page_size;
    }

    pub fn add_workgroup(&self, name: &str) {
        self.world().workgroups.insert(name.to_string());
    }

    pub fn add_cluster(&self, id: &str) {
        self.world().clusters.insert(id.to_string(), true);
    }

    pub fn add_log_group(&self, name: &str) {
        self.world().log_groups.insert(name.to_string());
    }

    pub fn add_dashboard(&self, id: &str) {
        self.world().dashboards.insert(id.to_string());
    }

    pub fn add_flow(&self, name: &str) {
        self.world().flows.insert(name.to_string());
    }

    /// Fail the next `times` deletes of `key` with a name-resolution error
    pub fn fail_transiently(&self, key: &str, times: usize) {
        self.world().transient_failures.insert(key.to_string(), times);
    }

    /// Fail every delete of `key` with a non-retryable error
    pub fn fail_permanently(&self, key: &str) {
        self.world().permanent_failures.insert(key.to_string());
    }

    /// Every call made, in order, as `"<operation> <target>"`
    pub fn calls(&self) -> Vec<String> {
        self.world().calls.clone()
    }

    /// Calls that change state
    pub fn mutating_calls(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| !c.starts_with("list_") && !c.starts_with("describe_"))
            .collect()
    }

    /// Index of the first call equal to `call`
    pub fn position(&self, call: &str) -> Option<usize> {
        self.calls().iter().position(|c| c == call)
    }

    pub fn attempts(&self, key: &str) -> usize {
        self.world().attempts.get(key).copied().unwrap_or(0)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn bucket_versions(&self, name: &str) -> Option<usize> {
        self.world().buckets.get(name).map(Vec::len)
    }

    pub fn stack_status(&self, name: &str) -> Option<String> {
        self.world()
            .stacks
            .iter()
            .rev()
            .find(|s| s.descriptor.name == name)
            .map(|s| s.descriptor.status.clone())
    }

    pub fn cluster_protected(&self, id: &str) -> Option<bool> {
        self.world().clusters.get(id).copied()
    }

    pub fn log_groups(&self) -> BTreeSet<String> {
        self.world().log_groups.clone()
    }

    pub fn workgroups(&self) -> BTreeSet<String> {
        self.world().workgroups.clone()
    }

    pub fn flows(&self) -> BTreeSet<String> {
        self.world().flows.clone()
    }

    pub fn dashboards(&self) -> BTreeSet<String> {
        self.world().dashboards.clone()
    }

    fn record(&self, call: String) {
        self.world().calls.push(call);
    }
}

impl World {
    fn live_stack_mut(&mut self, name: &str) -> Option<&mut FakeStack> {
        self.stacks
            .iter_mut()
            .find(|s| s.descriptor.name == name && s.descriptor.status != "DELETE_COMPLETE")
    }

    /// Why CloudFormation would fail to delete these members, if it would
    fn blocker(&self, resources: &[StackMemberResource]) -> Option<String> {
        resources.iter().find_map(|r| {
            let physical = r.physical_id.as_deref()?;
            match r.kind()? {
                MemberKind::Bucket if self.buckets.get(physical).is_some_and(|v| !v.is_empty()) => {
                    Some(format!("The bucket you tried to delete is not empty: {physical}"))
                }
                MemberKind::Workgroup if self.workgroups.contains(physical) => {
                    Some(format!("WorkGroup {physical} is not empty"))
                }
                MemberKind::Cluster if self.clusters.get(physical) == Some(&true) => {
                    Some(format!("Cannot delete protected Cluster {physical}"))
                }
                _ => None,
            }
        })
    }

    fn remove_members(&mut self, resources: &[StackMemberResource]) {
        for r in resources {
            let Some(physical) = r.physical_id.as_deref() else {
                continue;
            };
            match r.kind() {
                Some(MemberKind::Bucket) => {
                    self.buckets.remove(physical);
                }
                Some(MemberKind::Workgroup) => {
                    self.workgroups.remove(physical);
                }
                Some(MemberKind::Cluster) => {
                    self.clusters.remove(physical);
                }
                Some(MemberKind::Function) | None => {}
            }
        }
    }
}

impl StackOperations for FakeCloud {
    async fn list_stacks(&self) -> Result<Vec<StackDescriptor>> {
        self.record("list_stacks".to_string());
        Ok(self
            .world()
            .stacks
            .iter()
            .map(|s| s.descriptor.clone())
            .collect())
    }

    async fn list_stack_resources(&self, stack_name: &str) -> Result<Vec<StackMemberResource>> {
        self.record(format!("list_stack_resources {stack_name}"));
        let mut world = self.world();
        match world.live_stack_mut(stack_name) {
            Some(stack) => Ok(stack.resources.clone()),
            None => Err(denied(&format!("Stack with id {stack_name} does not exist"))),
        }
    }

    async fn describe_stack(&self, stack_id: &str) -> Result<Option<StackDescriptor>> {
        self.record(format!("describe_stack {stack_id}"));
        let mut guard = self.world();
        let world = &mut *guard;
        let Some(index) = world.stacks.iter().position(|s| s.descriptor.id == stack_id) else {
            return Ok(None);
        };

        let next = world.stacks[index].pending.as_mut().map(|pending| {
            if pending.len() > 1 {
                pending.pop_front().unwrap_or_default()
            } else {
                pending.front().cloned().unwrap_or_default()
            }
        });
        if let Some(status) = next {
            if status == "DELETE_COMPLETE" {
                let resources = world.stacks[index].resources.clone();
                world.remove_members(&resources);
            }
            if status == "DELETE_FAILED" && world.stacks[index].descriptor.status_reason.is_none() {
                world.stacks[index].descriptor.status_reason =
                    Some("The following resource(s) failed to delete".to_string());
            }
            world.stacks[index].descriptor.status = status;
        }

        Ok(Some(world.stacks[index].descriptor.clone()))
    }

    async fn disable_termination_protection(&self, stack_name: &str) -> Result<()> {
        self.record(format!("disable_termination_protection {stack_name}"));
        let mut world = self.world();
        if let Some(stack) = world.live_stack_mut(stack_name) {
            stack.termination_protected = false;
        }
        Ok(())
    }

    async fn delete_stack(&self, stack_name: &str) -> Result<()> {
        self.record(format!("delete_stack {stack_name}"));
        let mut guard = self.world();
        let world = &mut *guard;
        let scripted = world.scripted.get(stack_name).cloned();
        let Some(index) = world
            .stacks
            .iter()
            .position(|s| s.descriptor.name == stack_name && s.descriptor.status != "DELETE_COMPLETE")
        else {
            return Ok(());
        };
        if world.stacks[index].termination_protected {
            return Err(denied(&format!(
                "Stack [{stack_name}] cannot be deleted while TerminationProtection is enabled"
            )));
        }

        let statuses: VecDeque<String> = match (scripted, world.blocker(&world.stacks[index].resources)) {
            (_, Some(reason)) => {
                world.stacks[index].descriptor.status_reason = Some(reason);
                ["DELETE_IN_PROGRESS", "DELETE_FAILED"].map(String::from).into()
            }
            (Some(script), None) => script.into(),
            (None, None) => ["DELETE_IN_PROGRESS", "DELETE_COMPLETE"].map(String::from).into(),
        };
        world.stacks[index].descriptor.status = "DELETE_IN_PROGRESS".to_string();
        world.stacks[index].pending = Some(statuses);
        Ok(())
    }
}

impl BucketOperations for FakeCloud {
    async fn list_object_versions(
        &self,
        bucket: &str,
        cursor: &VersionCursor,
    ) -> Result<ObjectVersionPage> {
        self.record(format!("list_object_versions {bucket}"));
        let world = self.world();
        let Some(records) = world.buckets.get(bucket) else {
            return Err(not_found("bucket", bucket));
        };

        // Markers name the last record returned; resume after it
        let start = match (&cursor.key_marker, &cursor.version_id_marker) {
            (Some(key), Some(version)) => records
                .iter()
                .position(|r| &r.key == key && &r.version_id == version)
                .map_or(records.len(), |i| i + 1),
            _ => 0,
        };
        let end = (start + world.page_size).min(records.len());
        let page: Vec<_> = records[start..end].to_vec();
        let next = if end < records.len() {
            let last = &records[end - 1];
            VersionCursor {
                key_marker: Some(last.key.clone()),
                version_id_marker: Some(last.version_id.clone()),
            }
        } else {
            VersionCursor::default()
        };

        Ok(ObjectVersionPage {
            records: page,
            next,
        })
    }

    async fn delete_object_version(&self, bucket: &str, key: &str, version_id: &str) -> Result<()> {
        self.record(format!("delete_object_version {bucket}/{key}"));

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        tokio::task::yield_now().await;
        tokio::task::yield_now().await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        let mut world = self.world();
        *world.attempts.entry(key.to_string()).or_default() += 1;

        if world.permanent_failures.contains(key) {
            return Err(denied(&format!("Access Denied deleting {key}")));
        }
        if let Some(remaining) = world.transient_failures.get_mut(key) {
            if *remaining > 0 {
                *remaining -= 1;
                return Err(name_resolution(&format!("{bucket}.s3.amazonaws.com")));
            }
        }

        let Some(records) = world.buckets.get_mut(bucket) else {
            return Err(not_found("bucket", bucket));
        };
        records.retain(|r| !(r.key == key && r.version_id == version_id));
        Ok(())
    }
}

impl WorkgroupOperations for FakeCloud {
    async fn list_workgroups(&self) -> Result<Vec<String>> {
        self.record("list_workgroups".to_string());
        Ok(self.world().workgroups.iter().cloned().collect())
    }

    async fn delete_workgroup(&self, name: &str) -> Result<()> {
        self.record(format!("delete_workgroup {name}"));
        if self.world().workgroups.remove(name) {
            Ok(())
        } else {
            Err(not_found("workgroup", name))
        }
    }
}

impl ClusterOperations for FakeCloud {
    async fn disable_deletion_protection(&self, cluster_id: &str) -> Result<()> {
        self.record(format!("disable_deletion_protection {cluster_id}"));
        match self.world().clusters.get_mut(cluster_id) {
            Some(protected) => {
                *protected = false;
                Ok(())
            }
            None => Err(not_found("cluster", cluster_id)),
        }
    }
}

impl LogGroupOperations for FakeCloud {
    async fn list_log_groups(&self, prefix: &str) -> Result<Vec<String>> {
        self.record(format!("list_log_groups {prefix}"));
        Ok(self
            .world()
            .log_groups
            .iter()
            .filter(|g| g.starts_with(prefix))
            .cloned()
            .collect())
    }

    async fn delete_log_group(&self, name: &str) -> Result<()> {
        self.record(format!("delete_log_group {name}"));
        if self.world().log_groups.remove(name) {
            Ok(())
        } else {
            Err(not_found("log group", name))
        }
    }
}

impl DashboardOperations for FakeCloud {
    async fn delete_dashboard(&self, dashboard_id: &str) -> Result<()> {
        self.record(format!("delete_dashboard {dashboard_id}"));
        if self.world().dashboards.remove(dashboard_id) {
            Ok(())
        } else {
            Err(not_found("dashboard", dashboard_id))
        }
    }
}

impl FlowOperations for FakeCloud {
    async fn list_flows(&self) -> Result<Vec<String>> {
        self.record("list_flows".to_string());
        Ok(self.world().flows.iter().cloned().collect())
    }

    async fn delete_flow(&self, name: &str) -> Result<()> {
        self.record(format!("delete_flow {name}"));
        if self.world().flows.remove(name) {
            Ok(())
        } else {
            Err(not_found("flow", name))
        }
    }
}

impl CloudApi for FakeCloud {
    type Stacks = Self;
    type Buckets = Self;
    type Workgroups = Self;
    type Clusters = Self;
    type LogGroups = Self;
    type Dashboards = Self;
    type Flows = Self;

    fn stacks(&self) -> &Self {
        self
    }
    fn buckets(&self) -> &Self {
        self
    }
    fn workgroups(&self) -> &Self {
        self
    }
    fn clusters(&self) -> &Self {
        self
    }
    fn log_groups(&self) -> &Self {
        self
    }
    fn dashboards(&self) -> &Self {
        self
    }
    fn flows(&self) -> &Self {
        self
    }
}

/// Reporter that keeps every event for later assertions
#[derive(Default)]
pub struct RecordingReporter {
    events: Mutex<Vec<TeardownEvent>>,
}

impl RecordingReporter {
    pub fn events(&self) -> Vec<TeardownEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl TeardownReporter for RecordingReporter {
    fn report(&self, event: TeardownEvent) {
        self.events.lock().unwrap().push(event);
    }
}
