//! Scheduled Executor Module Tests
//!
//! ## Test Scopes
//! - **Routing**: pinned partitions win over the scheduler name's partition.
//! - **Authorization**: denied requests never reach the dispatcher.
//! - **Task lifecycle**: submit, cancel, run accounting, delay, dispose.
//! - **Payloads**: malformed and oversized payloads are refused before routing.

#[cfg(test)]
mod tests {
    use crate::partition::{
        Operation, OperationDispatcher, PartitionDispatcher, PartitionId, PartitionJob,
        PartitionManager, RoutingError, ServiceRegistry, invoke,
    };
    use crate::protocol::error::{ACCESS_DENIED, MALFORMED_REQUEST, ROUTING_FAILURE};
    use crate::protocol::{ClientMessage, ClientResponse};
    use crate::scheduledexecutor::operations::RecordRunOperation;
    use crate::scheduledexecutor::register_tasks;
    use crate::scheduledexecutor::service::ScheduledExecutorService;
    use crate::scheduledexecutor::tasks::*;
    use crate::scheduledexecutor::types::*;
    use crate::security::{Action, PermissionEvaluator, RequiredPermission};
    use crate::task::{TaskContext, TaskRegistry};
    use crate::versioning::Version;
    use crate::wire::{WireReader, WireWriter};
    use bytes::Bytes;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const PARTITIONS: u32 = 271;

    /// Forwards to a real dispatcher and counts what reached it.
    struct SpyDispatcher {
        inner: Arc<PartitionDispatcher>,
        submits: AtomicUsize,
    }

    impl OperationDispatcher for SpyDispatcher {
        fn partition_count(&self) -> u32 {
            self.inner.partition_count()
        }

        fn submit(
            &self,
            service_name: &str,
            partition_id: PartitionId,
            job: PartitionJob,
        ) -> Result<(), RoutingError> {
            self.submits.fetch_add(1, Ordering::SeqCst);
            self.inner.submit(service_name, partition_id, job)
        }
    }

    struct Harness {
        service: Arc<ScheduledExecutorService>,
        spy: Arc<SpyDispatcher>,
        ctx: TaskContext,
        registry: Arc<TaskRegistry>,
    }

    impl Harness {
        fn new(security: Arc<dyn PermissionEvaluator>) -> Self {
            let service = ScheduledExecutorService::new();
            let services = ServiceRegistry::new();
            services.register(service.clone());

            let spy = Arc::new(SpyDispatcher {
                inner: PartitionDispatcher::start(services, PARTITIONS, 4),
                submits: AtomicUsize::new(0),
            });
            let ctx = TaskContext::new(
                Arc::new(PartitionManager::new(PARTITIONS)),
                spy.clone(),
                security,
            );

            let registry = TaskRegistry::new();
            register_tasks(&registry);

            Self {
                service,
                spy,
                ctx,
                registry,
            }
        }

        fn unsecured() -> Self {
            Self::new(Arc::new(crate::security::AllowAll))
        }

        fn submits(&self) -> usize {
            self.spy.submits.load(Ordering::SeqCst)
        }

        async fn send(
            &self,
            message_type: u16,
            partition: Option<PartitionId>,
            payload: Bytes,
        ) -> ClientResponse {
            let message = ClientMessage::new(42, message_type, partition, payload);
            self.registry
                .handle(message, Version::CURRENT, &self.ctx)
                .await
        }

        async fn submit(
            &self,
            partition: Option<PartitionId>,
            scheduler: &str,
            task: &str,
        ) -> ClientResponse {
            let payload = submit_payload(scheduler, task, TaskType::OneShot, 60_000, 0);
            self.send(SUBMIT_TO_PARTITION, partition, payload).await
        }
    }

    fn submit_payload(
        scheduler: &str,
        task: &str,
        task_type: TaskType,
        initial_delay_ms: i64,
        period_ms: i64,
    ) -> Bytes {
        let params = SubmitParams {
            scheduler_name: scheduler.to_string(),
            definition: TaskDefinition {
                name: task.to_string(),
                task_type,
                initial_delay_ms,
                period_ms,
            },
        };
        let mut out = WireWriter::new();
        params.encode(&mut out);
        out.freeze()
    }

    fn task_payload(scheduler: &str, task: &str) -> Bytes {
        let mut out = WireWriter::new();
        TaskRef::new(scheduler, task).encode(&mut out);
        out.freeze()
    }

    fn cancel_payload(scheduler: &str, task: &str) -> Bytes {
        let mut out = WireWriter::new();
        TaskRef::new(scheduler, task).encode(&mut out);
        out.write_bool(true);
        out.freeze()
    }

    fn success_payload(response: ClientResponse) -> WireReader {
        match response {
            ClientResponse::Success { payload, .. } => WireReader::new(payload),
            other => panic!("expected success, got {:?}", other),
        }
    }

    fn error_code(response: &ClientResponse) -> i32 {
        match response {
            ClientResponse::Error { error_code, .. } => *error_code,
            other => panic!("expected error, got {:?}", other),
        }
    }

    fn read_bool(response: ClientResponse) -> bool {
        let mut payload = success_payload(response);
        let value = payload.read_bool().unwrap();
        payload.finish().unwrap();
        value
    }

    // ============================================================
    // ROUTING
    // ============================================================

    #[tokio::test]
    async fn test_pinned_partition_wins_over_name() {
        // ARRANGE
        let h = Harness::unsecured();
        let hashed = h.ctx.partitioner.get_partition("sched-1");

        // ACT
        let submitted = h.submit(Some(7), "sched-1", "t1").await;
        let stats = h
            .send(GET_STATS_FROM_PARTITION, Some(7), task_payload("sched-1", "t1"))
            .await;

        // ASSERT
        assert!(!submitted.is_error());
        assert_eq!(submitted.correlation_id(), 42);
        assert_eq!(h.service.task_count(7), 1);

        let mut payload = success_payload(stats);
        for _ in 0..4 {
            assert_eq!(payload.read_i64().unwrap(), 0);
        }
        payload.finish().unwrap();

        if hashed != 7 {
            assert_eq!(h.service.task_count(hashed), 0);
            let unpinned = h
                .send(GET_STATS_FROM_PARTITION, None, task_payload("sched-1", "t1"))
                .await;
            assert_eq!(error_code(&unpinned), STALE_TASK_HANDLER);
        }
    }

    #[tokio::test]
    async fn test_unpinned_request_follows_scheduler_name() {
        let h = Harness::unsecured();
        let expected = h.ctx.partitioner.get_partition("reports");

        let response = h.submit(None, "reports", "nightly").await;

        assert!(!response.is_error());
        assert_eq!(h.service.task_count(expected), 1);
        assert_eq!(h.ctx.partitioner.get_partition("reports"), expected);
    }

    #[tokio::test]
    async fn test_pinned_partition_out_of_range() {
        let h = Harness::unsecured();

        let response = h.submit(Some(PARTITIONS), "sched-1", "t1").await;

        assert_eq!(error_code(&response), ROUTING_FAILURE);
        assert_eq!(h.submits(), 0);
    }

    // ============================================================
    // AUTHORIZATION
    // ============================================================

    #[tokio::test]
    async fn test_denied_request_never_dispatched() {
        // ARRANGE
        let h = Harness::new(Arc::new(|_: &RequiredPermission| false));

        // ACT
        let response = h
            .send(GET_STATS_FROM_PARTITION, Some(7), task_payload("sched-1", "t1"))
            .await;

        // ASSERT
        assert_eq!(h.submits(), 0);
        match response {
            ClientResponse::Error {
                correlation_id,
                error_code,
                message,
            } => {
                assert_eq!(correlation_id, 42);
                assert_eq!(error_code, ACCESS_DENIED);
                assert!(message.contains("ScheduledExecutorPermission(sched-1, read)"));
            }
            other => panic!("expected error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_permission_follows_action() {
        let h = Harness::new(Arc::new(|p: &RequiredPermission| {
            p.action != Action::Destroy
        }));
        h.submit(Some(3), "sched-1", "t1").await;

        let done = h
            .send(IS_DONE_FROM_PARTITION, Some(3), task_payload("sched-1", "t1"))
            .await;
        let disposed = h
            .send(DISPOSE_FROM_PARTITION, Some(3), task_payload("sched-1", "t1"))
            .await;

        assert!(!read_bool(done));
        assert_eq!(error_code(&disposed), ACCESS_DENIED);
        assert_eq!(h.submits(), 2);
        assert_eq!(h.service.task_count(3), 1);
    }

    // ============================================================
    // TASK LIFECYCLE
    // ============================================================

    #[tokio::test]
    async fn test_duplicate_submit_rejected() {
        let h = Harness::unsecured();

        h.submit(Some(1), "sched-1", "t1").await;
        let second = h.submit(Some(1), "sched-1", "t1").await;

        assert_eq!(error_code(&second), DUPLICATE_TASK);
        assert_eq!(h.service.task_count(1), 1);
    }

    #[tokio::test]
    async fn test_unknown_task_is_stale() {
        let h = Harness::unsecured();

        let response = h
            .send(IS_DONE_FROM_PARTITION, Some(1), task_payload("sched-1", "ghost"))
            .await;

        assert_eq!(error_code(&response), STALE_TASK_HANDLER);
        assert_eq!(h.submits(), 1);
    }

    #[tokio::test]
    async fn test_fixed_rate_needs_period() {
        let h = Harness::unsecured();

        let payload = submit_payload("sched-1", "t1", TaskType::FixedRate, 0, 0);
        let response = h.send(SUBMIT_TO_PARTITION, Some(1), payload).await;

        assert_eq!(error_code(&response), ILLEGAL_ARGUMENT);
        assert_eq!(h.service.task_count(1), 0);
    }

    #[tokio::test]
    async fn test_cancel_is_idempotent() {
        // ARRANGE
        let h = Harness::unsecured();
        h.submit(Some(5), "sched-1", "t1").await;

        // ACT
        let first = h
            .send(CANCEL_FROM_PARTITION, Some(5), cancel_payload("sched-1", "t1"))
            .await;
        let second = h
            .send(CANCEL_FROM_PARTITION, Some(5), cancel_payload("sched-1", "t1"))
            .await;
        let cancelled = h
            .send(IS_CANCELLED_FROM_PARTITION, Some(5), task_payload("sched-1", "t1"))
            .await;
        let done = h
            .send(IS_DONE_FROM_PARTITION, Some(5), task_payload("sched-1", "t1"))
            .await;

        // ASSERT
        assert!(read_bool(first));
        assert!(!read_bool(second));
        assert!(read_bool(cancelled));
        assert!(read_bool(done));
    }

    #[tokio::test]
    async fn test_recorded_run_completes_one_shot() {
        // ARRANGE
        let h = Harness::unsecured();
        h.submit(Some(9), "sched-1", "t1").await;
        let handler = ScheduledTaskHandler::of(9, "sched-1", "t1");

        // ACT
        let operation = Operation::new(
            SERVICE_NAME,
            9,
            RecordRunOperation {
                handler,
                idle_ns: 500,
                run_ns: 200,
            },
        );
        invoke(&*h.ctx.dispatcher, operation)
            .unwrap()
            .join()
            .await
            .unwrap();

        let done = h
            .send(IS_DONE_FROM_PARTITION, Some(9), task_payload("sched-1", "t1"))
            .await;
        let stats = h
            .send(GET_STATS_FROM_PARTITION, Some(9), task_payload("sched-1", "t1"))
            .await;

        // ASSERT
        assert!(read_bool(done));

        let mut payload = success_payload(stats);
        assert_eq!(payload.read_i64().unwrap(), 500); // last idle
        assert_eq!(payload.read_i64().unwrap(), 500); // total idle
        assert_eq!(payload.read_i64().unwrap(), 1); // runs
        assert_eq!(payload.read_i64().unwrap(), 200); // total run time
        payload.finish().unwrap();
    }

    #[tokio::test]
    async fn test_delay_counts_down_from_initial_delay() {
        let h = Harness::unsecured();
        h.submit(Some(2), "sched-1", "t1").await;

        let response = h
            .send(GET_DELAY_FROM_PARTITION, Some(2), task_payload("sched-1", "t1"))
            .await;

        let mut payload = success_payload(response);
        let delay = payload.read_i64().unwrap();
        assert!(delay > 0 && delay <= 60_000, "delay {}", delay);
    }

    #[test]
    fn test_fixed_rate_delay_advances_per_run() {
        let definition = TaskDefinition {
            name: "t1".to_string(),
            task_type: TaskType::FixedRate,
            initial_delay_ms: 100,
            period_ms: 1_000,
        };
        let mut task = ScheduledTaskDescriptor::new(definition, 10_000);

        assert_eq!(task.delay_ms(10_000), 100);

        task.stats.record_run(100, 5);
        task.stats.record_run(900, 5);
        assert_eq!(task.delay_ms(10_000), 2_100);
        assert_eq!(task.delay_ms(11_600), 500);
        assert_eq!(task.delay_ms(13_000), 0);
    }

    #[test]
    fn test_finished_task_has_no_delay() {
        let definition = TaskDefinition {
            name: "t1".to_string(),
            task_type: TaskType::FixedRate,
            initial_delay_ms: 5_000,
            period_ms: 1_000,
        };
        let mut task = ScheduledTaskDescriptor::new(definition, 0);

        task.state = TaskState::Cancelled;
        assert_eq!(task.delay_ms(0), 0);
        task.state = TaskState::Done;
        assert_eq!(task.delay_ms(0), 0);
    }

    #[test]
    fn test_far_schedule_saturates() {
        let definition = TaskDefinition {
            name: "t1".to_string(),
            task_type: TaskType::FixedRate,
            initial_delay_ms: i64::MAX,
            period_ms: i64::MAX,
        };
        let mut task = ScheduledTaskDescriptor::new(definition, u64::MAX - 10);
        task.stats.record_run(0, 0);
        task.stats.record_run(0, 0);

        assert_eq!(task.delay_ms(0), i64::MAX);
    }

    #[tokio::test]
    async fn test_delay_of_huge_period_after_runs() {
        // ARRANGE
        let h = Harness::unsecured();
        let payload = submit_payload("sched-1", "t1", TaskType::FixedRate, 0, i64::MAX);
        assert!(!h.send(SUBMIT_TO_PARTITION, Some(2), payload).await.is_error());

        for _ in 0..3 {
            let operation = Operation::new(
                SERVICE_NAME,
                2,
                RecordRunOperation {
                    handler: ScheduledTaskHandler::of(2, "sched-1", "t1"),
                    idle_ns: 10,
                    run_ns: 10,
                },
            );
            invoke(&*h.ctx.dispatcher, operation)
                .unwrap()
                .join()
                .await
                .unwrap();
        }

        // ACT
        let response = h
            .send(GET_DELAY_FROM_PARTITION, Some(2), task_payload("sched-1", "t1"))
            .await;

        // ASSERT
        let mut payload = success_payload(response);
        assert_eq!(payload.read_i64().unwrap(), i64::MAX);
        payload.finish().unwrap();
    }

    #[tokio::test]
    async fn test_completed_one_shot_reports_zero_delay() {
        let h = Harness::unsecured();
        h.submit(Some(6), "sched-1", "t1").await;
        let operation = Operation::new(
            SERVICE_NAME,
            6,
            RecordRunOperation {
                handler: ScheduledTaskHandler::of(6, "sched-1", "t1"),
                idle_ns: 1,
                run_ns: 1,
            },
        );
        invoke(&*h.ctx.dispatcher, operation)
            .unwrap()
            .join()
            .await
            .unwrap();

        let response = h
            .send(GET_DELAY_FROM_PARTITION, Some(6), task_payload("sched-1", "t1"))
            .await;

        let mut payload = success_payload(response);
        assert_eq!(payload.read_i64().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_dispose_makes_handler_stale() {
        let h = Harness::unsecured();
        h.submit(Some(4), "sched-1", "t1").await;

        let disposed = h
            .send(DISPOSE_FROM_PARTITION, Some(4), task_payload("sched-1", "t1"))
            .await;
        let after = h
            .send(IS_DONE_FROM_PARTITION, Some(4), task_payload("sched-1", "t1"))
            .await;

        let payload = success_payload(disposed);
        assert_eq!(payload.remaining(), 0);
        assert_eq!(error_code(&after), STALE_TASK_HANDLER);
        assert_eq!(h.service.task_count(4), 0);
    }

    // ============================================================
    // PAYLOADS
    // ============================================================

    #[tokio::test]
    async fn test_unknown_task_type_is_malformed() {
        let h = Harness::unsecured();

        let mut out = WireWriter::new();
        out.write_string("sched-1");
        out.write_string("t1");
        out.write_u8(9);
        out.write_i64(0);
        out.write_i64(0);
        let response = h.send(SUBMIT_TO_PARTITION, Some(1), out.freeze()).await;

        assert_eq!(error_code(&response), MALFORMED_REQUEST);
        assert_eq!(h.submits(), 0);
    }

    #[tokio::test]
    async fn test_truncated_and_oversized_payloads_rejected() {
        let h = Harness::unsecured();
        let full = task_payload("sched-1", "t1");

        let truncated = h
            .send(IS_DONE_FROM_PARTITION, Some(1), full.slice(..full.len() - 1))
            .await;

        let mut padded = full.to_vec();
        padded.push(0);
        let oversized = h
            .send(IS_DONE_FROM_PARTITION, Some(1), Bytes::from(padded))
            .await;

        assert_eq!(error_code(&truncated), MALFORMED_REQUEST);
        assert_eq!(error_code(&oversized), MALFORMED_REQUEST);
        assert_eq!(h.submits(), 0);
    }

    #[tokio::test]
    async fn test_frame_round_trip_through_registry() {
        // ARRANGE
        let h = Harness::unsecured();
        let request = ClientMessage::new(
            1001,
            SUBMIT_TO_PARTITION,
            Some(7),
            submit_payload("sched-1", "t1", TaskType::FixedRate, 10, 1_000),
        );

        // ACT
        let frame = h
            .registry
            .handle_frame(request.encode(), Version::CURRENT, &h.ctx)
            .await;

        // ASSERT
        match ClientResponse::decode(frame).unwrap() {
            ClientResponse::Success {
                correlation_id,
                message_type,
                payload,
            } => {
                assert_eq!(correlation_id, 1001);
                assert_eq!(message_type, SUBMIT_TO_PARTITION);
                assert!(payload.is_empty());
            }
            other => panic!("expected success, got {:?}", other),
        }
        assert_eq!(h.service.task_count(7), 1);
    }

    #[test]
    fn test_all_tasks_registered() {
        let registry = TaskRegistry::new();
        register_tasks(&registry);

        let types: Vec<u16> = registry.list_tasks().into_iter().map(|(t, _)| t).collect();
        assert_eq!(
            types,
            vec![
                SUBMIT_TO_PARTITION,
                GET_STATS_FROM_PARTITION,
                CANCEL_FROM_PARTITION,
                IS_DONE_FROM_PARTITION,
                IS_CANCELLED_FROM_PARTITION,
                GET_DELAY_FROM_PARTITION,
                DISPOSE_FROM_PARTITION,
            ]
        );
    }
}
