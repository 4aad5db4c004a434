// Copyright 2026 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;

use crate::session::Session;
use crate::session::SessionOptions;

/// A session shared between threads. Every operation runs under the one session lock.
#[derive(Clone, Debug)]
pub struct SharedSession(Arc<Mutex<Session>>);

impl SharedSession {
    pub fn new(options: SessionOptions) -> Self {
        Self(Arc::new(Mutex::new(Session::with_options(options))))
    }

    /// Locks the session. A panic on another thread while it held the lock does not poison the
    /// session for everyone else.
    pub fn lock(&self) -> MutexGuard<'_, Session> {
        self.0.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Returns the session if this is the last handle to it, or the handle back otherwise.
    pub fn into_inner(self) -> Result<Session, Self> {
        match Arc::try_unwrap(self.0) {
            Ok(mutex) => Ok(mutex.into_inner().unwrap_or_else(|e| e.into_inner())),
            Err(arc) => Err(Self(arc)),
        }
    }
}

impl From<Session> for SharedSession {
    fn from(session: Session) -> Self {
        Self(Arc::new(Mutex::new(session)))
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;
    use crate::object_heap::ObjectKind;
    use crate::types::RtFormat;

    #[test]
    fn test_concurrent_allocation() {
        let shared = SharedSession::new(SessionOptions::default());
        let workers: Vec<_> = (0..4)
            .map(|_| {
                let shared = shared.clone();
                thread::spawn(move || {
                    (0..25)
                        .map(|_| {
                            shared.lock().create_surfaces(8, 8, RtFormat::YUV420, 1).unwrap()[0]
                        })
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let mut surfaces: Vec<_> = workers.into_iter().flat_map(|w| w.join().unwrap()).collect();
        surfaces.sort_by_key(|s| s.raw());
        surfaces.dedup();
        assert_eq!(surfaces.len(), 100);

        let mut session = shared.into_inner().unwrap();
        assert_eq!(session.object_count(ObjectKind::Surface), 100);
        session.destroy_surfaces(&surfaces).unwrap();
        session.destroy();
    }

    #[test]
    fn test_lock_after_panicking_holder() {
        let shared = SharedSession::new(SessionOptions::default());
        let other = shared.clone();
        let result = thread::spawn(move || {
            let _session = other.lock();
            panic!("worker died holding the session");
        })
        .join();
        assert!(result.is_err());

        let surfaces = shared.lock().create_surfaces(8, 8, RtFormat::YUV420, 2).unwrap();
        assert_eq!(shared.lock().object_count(ObjectKind::Surface), 2);
        let mut session = shared.into_inner().unwrap();
        session.destroy_surfaces(&surfaces).unwrap();
        session.destroy();
    }

    #[test]
    fn test_into_inner_with_other_handles() {
        let shared = SharedSession::from(Session::new());
        let other = shared.clone();
        let shared = shared.into_inner().unwrap_err();
        drop(other);
        shared.into_inner().unwrap().destroy();
    }
}
