//! Browser side of a seat hold: a [`HoldCoordinator`] plus the render state
//! mirroring it, shared by the customer seat page and the counter.

use super::mint_session;
use crate::api;
use crate::components::toast::Toaster;
use crate::dom;
use crate::i18n::t;
use cinema_core::api::{ApiCall, SeatAvailability, endpoints};
use cinema_core::hold::{
    EXTEND_MINUTES, HoldCoordinator, HoldEvent, HoldGrant, HoldPolicy, HoldRequest, Release,
    SelectedSeat, SelectionError, SessionId, Toggle, remaining_secs,
};
use cinema_core::models::Seat;
use cinema_core::seatmap::check_selectable;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

pub(crate) const TICK_MS: i32 = 1_000;

#[derive(Clone)]
pub(crate) struct HoldView {
    pub showtime_id: i64,
    pub coordinator: Rc<RefCell<HoldCoordinator>>,
    pub selected: UseStateHandle<Vec<SelectedSeat>>,
    pub own_session: UseStateHandle<Option<String>>,
    pub remaining: UseStateHandle<Option<u64>>,
    pub seats: UseStateHandle<Option<Vec<Seat>>>,
    pub toaster: Toaster,
}

#[hook]
pub(crate) fn use_hold_view(showtime_id: i64, policy: HoldPolicy, toaster: Toaster) -> HoldView {
    let coordinator = use_mut_ref(|| HoldCoordinator::new(policy));
    HoldView {
        showtime_id,
        coordinator,
        selected: use_state(Vec::new),
        own_session: use_state(|| None),
        remaining: use_state(|| None),
        seats: use_state(|| None),
        toaster,
    }
}

impl HoldView {
    fn is_counter(&self) -> bool {
        self.coordinator.borrow().policy() == HoldPolicy::LockWhileHeld
    }

    pub fn session(&self) -> Option<SessionId> {
        self.coordinator.borrow().session().cloned()
    }

    /// Copy the coordinator's selection and session into render state.
    pub fn sync(&self) {
        let coordinator = self.coordinator.borrow();
        self.selected
            .set(coordinator.selection().iter().cloned().collect());
        self.own_session
            .set(coordinator.session().map(ToString::to_string));
        if !coordinator.is_holding() {
            self.remaining.set(None);
        }
    }

    /// Fetch the seat map. The storefront asks for availability relative to
    /// its session; the counter reads raw statuses.
    pub fn load_seats(&self) {
        let session = self
            .coordinator
            .borrow_mut()
            .ensure_session(mint_session);
        let call: ApiCall = if self.is_counter() {
            endpoints::seats_for_showtime(self.showtime_id)
        } else {
            endpoints::seat_availability(self.showtime_id, session.as_str())
        };
        let live = self.is_counter();
        let view = self.clone();
        spawn_local(async move {
            let loaded = if live {
                api::get::<Vec<Seat>>(call).await
            } else {
                api::get::<SeatAvailability>(call).await.map(|a| a.seats)
            };
            match loaded {
                Ok(seats) => view.seats.set(Some(seats)),
                Err(err) => {
                    log::error!("seats for showtime {}: {err}", view.showtime_id);
                    view.toaster
                        .error(err.user_message(&t("seats.load_failed")));
                    view.seats.set(Some(Vec::new()));
                }
            }
        });
    }

    /// Apply a click on `seat`. Returns the toggle so callers can hold.
    pub fn toggle(&self, seat: &Seat) -> Option<Toggle> {
        let own = self.session();
        let was_holding = self.coordinator.borrow().is_holding();
        if let Err(block) = check_selectable(seat, own.as_ref().map(SessionId::as_str)) {
            self.toaster.warning(t(block.i18n_key()));
            return None;
        }
        let toggled: Result<Toggle, SelectionError> = self
            .coordinator
            .borrow_mut()
            .toggle(SelectedSeat::from(seat));
        match toggled {
            Ok(Toggle::Removed) => {
                self.coordinator.borrow_mut().seat_released(seat.seat_id);
                self.sync();
                if let Some(session_id) = own
                    && was_holding
                {
                    send_release(
                        self.showtime_id,
                        Release {
                            session_id,
                            seat_ids: vec![seat.seat_id],
                        },
                    );
                }
                Some(Toggle::Removed)
            }
            Ok(Toggle::Added) => {
                self.sync();
                Some(Toggle::Added)
            }
            Err(err) => {
                self.toaster.warning(t(err.i18n_key()));
                None
            }
        }
    }

    /// Hold the whole selection. Failures keep the selection and toast.
    pub fn request_hold(&self, customer_email: Option<String>) {
        self.coordinator
            .borrow_mut()
            .ensure_session(mint_session);
        let request: Option<HoldRequest> = self
            .coordinator
            .borrow()
            .hold_request(self.showtime_id, customer_email);
        let Some(request) = request else {
            return;
        };
        self.sync();
        let view = self.clone();
        spawn_local(async move {
            match api::post::<HoldRequest, HoldGrant>(endpoints::hold_seats(), &request).await {
                Ok(grant) => {
                    let applied = view.coordinator.borrow_mut().hold_granted(&grant);
                    if applied {
                        view.remaining
                            .set(Some(remaining_secs(grant.hold_expires_at, dom::now_ms())));
                        log::info!("held {:?} under {}", request.seat_ids, request.session_id);
                    } else {
                        log::info!("hold on {:?} arrived after deselect, releasing", request.seat_ids);
                        let call = endpoints::release_seats(&request.session_id, view.showtime_id, &request.seat_ids);
                        if let Err(err) = api::fire(call).await {
                            log::warn!("releasing late hold {:?} failed: {err}", request.seat_ids);
                        }
                    }
                }
                Err(err) => {
                    log::error!("holding {:?} failed: {err}", request.seat_ids);
                    view.toaster
                        .error(err.user_message(&t("seats.hold_failed")));
                }
            }
        });
    }

    fn request_extension(&self) {
        let (session, seat_ids) = {
            let coordinator = self.coordinator.borrow();
            (
                coordinator.session().map(ToString::to_string),
                coordinator.selection().seat_ids(),
            )
        };
        let Some(session) = session else {
            return;
        };
        let view = self.clone();
        spawn_local(async move {
            let call = endpoints::extend_hold(&session, view.showtime_id, &seat_ids, EXTEND_MINUTES);
            match api::send::<(), HoldGrant>(call, None).await {
                Ok(grant) => {
                    view.coordinator.borrow_mut().hold_extended(&grant);
                    log::info!("hold {session} extended by {EXTEND_MINUTES} min");
                }
                Err(err) => log::warn!("extending hold {session} failed: {err}"),
            }
        });
    }

    /// One countdown step.
    pub fn tick(&self) {
        let event = self.coordinator.borrow_mut().tick(dom::now_ms());
        match event {
            HoldEvent::Idle => {}
            HoldEvent::Remaining { secs, extend } => {
                self.remaining.set(Some(secs));
                if extend {
                    self.request_extension();
                }
            }
            HoldEvent::Expired { release } => {
                self.toaster.warning(t("seats.hold_expired"));
                if let Some(release) = release {
                    send_release(self.showtime_id, release);
                }
                self.load_seats();
                self.sync();
            }
        }
    }

    /// Give everything back, e.g. on unmount or an explicit cancel.
    pub fn release_all(&self) {
        let release = self.coordinator.borrow_mut().reset();
        if let Some(release) = release {
            send_release(self.showtime_id, release);
        }
    }

    /// Forget the hold without releasing it; the booking now owns the seats.
    pub fn settle(&self) {
        let settled = self.coordinator.borrow_mut().reset();
        if let Some(release) = settled {
            log::debug!("hold {} handed to the booking with seats {:?}", release.session_id, release.seat_ids);
        }
        self.load_seats();
        self.sync();
    }

    /// Release URL for the unload beacon, when anything is selected.
    pub fn beacon_url(&self) -> Option<String> {
        let coordinator = self.coordinator.borrow();
        let seat_ids = coordinator.selection().seat_ids();
        let session = coordinator.session()?;
        (!seat_ids.is_empty()).then(|| {
            api::url_for(&endpoints::release_seats(session.as_str(), self.showtime_id, &seat_ids))
        })
    }
}

pub(crate) fn send_release(showtime_id: i64, release: Release) {
    spawn_local(async move {
        let call = endpoints::release_seats(release.session_id.as_str(), showtime_id, &release.seat_ids);
        if let Err(err) = api::fire(call).await {
            log::warn!("releasing {:?} failed: {err}", release.seat_ids);
        }
    });
}
