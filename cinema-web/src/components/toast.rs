//! Transient notifications shared through a context.

use std::rc::Rc;
use yew::prelude::*;

const TOAST_MS: i32 = 4_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Info,
    Warning,
    Error,
}

impl ToastKind {
    #[must_use]
    pub const fn class(self) -> &'static str {
        match self {
            Self::Success => "alert alert-success",
            Self::Info => "alert alert-info",
            Self::Warning => "alert alert-warning",
            Self::Error => "alert alert-error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToastItem {
    pub id: u32,
    pub kind: ToastKind,
    pub text: AttrValue,
}

/// Handle for raising toasts from any component under [`ToastHost`].
#[derive(Clone, PartialEq)]
pub struct Toaster {
    push: Callback<(ToastKind, AttrValue)>,
}

impl Toaster {
    pub fn show(&self, kind: ToastKind, text: impl Into<AttrValue>) {
        self.push.emit((kind, text.into()));
    }

    pub fn success(&self, text: impl Into<AttrValue>) {
        self.show(ToastKind::Success, text);
    }

    pub fn info(&self, text: impl Into<AttrValue>) {
        self.show(ToastKind::Info, text);
    }

    pub fn warning(&self, text: impl Into<AttrValue>) {
        self.show(ToastKind::Warning, text);
    }

    pub fn error(&self, text: impl Into<AttrValue>) {
        self.show(ToastKind::Error, text);
    }

    /// A toaster that logs instead of rendering, for components used outside
    /// the host.
    #[must_use]
    pub fn detached() -> Self {
        Self {
            push: Callback::from(|(kind, text): (ToastKind, AttrValue)| {
                log::info!("toast {kind:?}: {text}");
            }),
        }
    }
}

#[hook]
pub fn use_toaster() -> Toaster {
    use_context::<Toaster>().unwrap_or_else(Toaster::detached)
}

enum ToastAction {
    Push(ToastItem),
    Dismiss(u32),
}

#[derive(Default, PartialEq)]
struct ToastList {
    items: Vec<ToastItem>,
}

impl Reducible for ToastList {
    type Action = ToastAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut items = self.items.clone();
        match action {
            ToastAction::Push(item) => items.push(item),
            ToastAction::Dismiss(id) => items.retain(|t| t.id != id),
        }
        Rc::new(Self { items })
    }
}

#[derive(Properties, PartialEq)]
pub struct ToastHostProps {
    #[prop_or_default]
    pub children: Children,
}

/// Provides a [`Toaster`] to its children and renders the stack.
#[function_component(ToastHost)]
pub fn toast_host(props: &ToastHostProps) -> Html {
    let list = use_reducer(ToastList::default);
    let counter = use_mut_ref(|| 0_u32);

    let toaster = {
        let dispatcher = list.dispatcher();
        use_memo((), move |()| Toaster {
            push: Callback::from(move |(kind, text): (ToastKind, AttrValue)| {
                let id = {
                    let mut next = counter.borrow_mut();
                    *next = next.wrapping_add(1);
                    *next
                };
                dispatcher.dispatch(ToastAction::Push(ToastItem { id, kind, text }));
                let dispatcher = dispatcher.clone();
                yew::platform::spawn_local(async move {
                    if let Err(err) = crate::dom::sleep_ms(TOAST_MS).await {
                        log::debug!("toast timer failed: {}", crate::dom::js_error_message(&err));
                    }
                    dispatcher.dispatch(ToastAction::Dismiss(id));
                });
            }),
        })
    };

    let on_dismiss = {
        let dispatcher = list.dispatcher();
        Callback::from(move |id: u32| dispatcher.dispatch(ToastAction::Dismiss(id)))
    };

    html! {
        <ContextProvider<Toaster> context={(*toaster).clone()}>
            { for props.children.iter() }
            <ToastStack toasts={list.items.clone()} {on_dismiss} />
        </ContextProvider<Toaster>>
    }
}

#[derive(Properties, PartialEq)]
pub struct ToastStackProps {
    pub toasts: Vec<ToastItem>,
    pub on_dismiss: Callback<u32>,
}

#[function_component(ToastStack)]
pub fn toast_stack(props: &ToastStackProps) -> Html {
    html! {
        <div class="toast toast-end toast-top" role="status" aria-live="polite">
            { for props.toasts.iter().map(|toast| {
                let on_click = {
                    let cb = props.on_dismiss.clone();
                    let id = toast.id;
                    Callback::from(move |_| cb.emit(id))
                };
                html! {
                    <div key={toast.id} class={toast.kind.class()}>
                        <span>{ toast.text.clone() }</span>
                        <button type="button" class="btn btn-ghost btn-xs" aria-label={crate::i18n::t("ui.dismiss")} onclick={on_click}>{ "✕" }</button>
                    </div>
                }
            }) }
        </div>
    }
}
