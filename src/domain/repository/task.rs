use crate::domain::entity::{Task, TaskId};

/// Closure applied by [`TaskRepository::update`].
pub type TaskUpdateFn<'a> = dyn FnMut(Task) -> Task + 'a;

/// An abstract interface for storing [`Task`]s.
///
/// Implementations must serialize writers so that concurrent callers never
/// lose updates to each other.
#[cfg_attr(test, mockall::automock)]
pub trait TaskRepository: Send + Sync + 'static {
    /// Allocate a fresh id. Ids are strictly increasing and never handed out
    /// twice, even after the task owning it has been deleted.
    fn next_id(&self) -> TaskId;

    /// Insert or replace the task stored at its id, returning the stored value.
    fn save(&self, task: Task) -> Task;

    /// Look up a task.
    fn get(&self, id: TaskId) -> Option<Task>;

    /// Replace the task stored at `id` with `f` applied to it, returning the
    /// stored value. Reading and writing happen atomically, so no concurrent
    /// writer slips in between. Returns `None` without calling `f` if the
    /// task doesn't exist.
    fn update<'a>(&self, id: TaskId, f: &'a mut TaskUpdateFn<'a>) -> Option<Task>;

    /// Remove a task. Removing an absent task does nothing.
    fn delete(&self, id: TaskId);

    /// Get all tasks in ascending id order.
    fn all(&self) -> Vec<Task>;
}

/// Queries built on top of any [`TaskRepository`].
pub trait TaskRepositoryExt: TaskRepository {
    /// Get all tasks ordered ascending by `key`. The sort is stable, so tasks
    /// with equal keys keep their id order.
    fn get_all<K, F>(&self, key: F) -> Vec<Task>
    where
        K: Ord,
        F: FnMut(&Task) -> K,
    {
        let mut tasks = self.all();
        tasks.sort_by_key(key);
        tasks
    }
}

impl<T: TaskRepository + ?Sized> TaskRepositoryExt for T {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_repository_get_all_by_key() {
        let mock = init_mock();
        let ids: Vec<_> = mock
            .get_all(|task| task.is_done())
            .iter()
            .map(|task| task.id().get())
            .collect();
        assert_eq!(ids, vec![1, 3, 0, 2]);
    }

    #[test]
    fn task_repository_get_all_through_trait_object() {
        let mock: Box<dyn TaskRepository> = Box::new(init_mock());
        let titles: Vec<_> = mock
            .get_all(|task| task.title().to_owned())
            .into_iter()
            .map(|task| task.title().to_owned())
            .collect();
        assert_eq!(titles, vec!["a", "b", "c", "d"]);
    }

    fn init_mock() -> MockTaskRepository {
        let mut mock = MockTaskRepository::new();
        mock.expect_all().returning(|| {
            vec![
                Task::new(TaskId::new(0), "c".into(), "".into()).with_done(true),
                Task::new(TaskId::new(1), "a".into(), "".into()),
                Task::new(TaskId::new(2), "d".into(), "".into()).with_done(true),
                Task::new(TaskId::new(3), "b".into(), "".into()),
            ]
        });
        mock
    }
}
