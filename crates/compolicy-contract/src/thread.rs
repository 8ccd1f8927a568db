use std::marker::PhantomData;
use std::thread::{self, ThreadId};

/// Identifies the embedding application's coordination (UI) thread.
///
/// The handle itself is `Send + Sync` so providers can keep it, but the
/// [`MainThreadToken`] it hands out is bound to the thread that created it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MainThread {
    id: ThreadId,
}

impl MainThread {
    /// Capture the calling thread as the main thread.
    #[must_use]
    pub fn capture() -> Self {
        Self {
            id: thread::current().id(),
        }
    }

    #[must_use]
    pub fn is_current(&self) -> bool {
        thread::current().id() == self.id
    }

    /// A token proving the caller runs on this thread, or `None` elsewhere.
    #[must_use]
    pub fn token(&self) -> Option<MainThreadToken> {
        self.is_current().then(|| MainThreadToken {
            id: self.id,
            _not_send: PhantomData,
        })
    }
}

/// Proof of running on the main thread. Neither `Send` nor `Sync`.
#[derive(Debug)]
pub struct MainThreadToken {
    id: ThreadId,
    _not_send: PhantomData<*const ()>,
}

impl MainThreadToken {
    #[must_use]
    pub fn belongs_to(&self, main: &MainThread) -> bool {
        self.id == main.id
    }
}

#[cfg(test)]
mod tests {
    use super::MainThread;

    #[test]
    fn token_is_available_on_capturing_thread() {
        let main = MainThread::capture();

        let token = main.token().expect("capturing thread receives a token");

        assert!(main.is_current());
        assert!(token.belongs_to(&main));
    }

    #[test]
    fn token_is_refused_on_other_threads() {
        let main = MainThread::capture();

        let handle = std::thread::spawn(move || (main.is_current(), main.token().is_none()));
        let (is_current, refused) = handle.join().expect("worker thread joins");

        assert!(!is_current);
        assert!(refused);
    }

    #[test]
    fn token_does_not_belong_to_a_different_main_thread() {
        let other = std::thread::spawn(MainThread::capture)
            .join()
            .expect("worker thread joins");
        let main = MainThread::capture();

        let token = main.token().expect("capturing thread receives a token");

        assert!(!token.belongs_to(&other));
    }
}
