use std::{future::Future, pin::Pin, sync::Arc};

use crate::events::{EventHandler, EventProducer, Handler, SettlementCompletedEvent, WalletRechargedEvent};

#[derive(Default, Clone)]
pub struct EventProducers {
    pub wallet_recharged_producer: Vec<EventProducer<WalletRechargedEvent>>,
    pub settlement_completed_producer: Vec<EventProducer<SettlementCompletedEvent>>,
}

impl EventProducers {
    pub async fn publish_wallet_recharged(&self, event: WalletRechargedEvent) {
        for producer in &self.wallet_recharged_producer {
            producer.publish_event(event.clone()).await;
        }
    }

    pub async fn publish_settlement_completed(&self, event: SettlementCompletedEvent) {
        for producer in &self.settlement_completed_producer {
            producer.publish_event(event.clone()).await;
        }
    }
}

pub struct EventHandlers {
    pub on_wallet_recharged: Option<EventHandler<WalletRechargedEvent>>,
    pub on_settlement_completed: Option<EventHandler<SettlementCompletedEvent>>,
}

impl EventHandlers {
    pub fn new(buffer_size: usize, hooks: EventHooks) -> Self {
        let on_wallet_recharged = hooks.on_wallet_recharged.map(|f| EventHandler::new(buffer_size, f));
        let on_settlement_completed = hooks.on_settlement_completed.map(|f| EventHandler::new(buffer_size, f));
        Self { on_wallet_recharged, on_settlement_completed }
    }

    pub fn producers(&self) -> EventProducers {
        let mut result = EventProducers::default();
        if let Some(handler) = &self.on_wallet_recharged {
            result.wallet_recharged_producer.push(handler.subscribe());
        }
        if let Some(handler) = &self.on_settlement_completed {
            result.settlement_completed_producer.push(handler.subscribe());
        }
        result
    }

    pub async fn start_handlers(self) {
        if let Some(handler) = self.on_wallet_recharged {
            tokio::spawn(handler.start_handler());
        }
        if let Some(handler) = self.on_settlement_completed {
            tokio::spawn(handler.start_handler());
        }
    }
}

#[derive(Default, Clone)]
pub struct EventHooks {
    pub on_wallet_recharged: Option<Handler<WalletRechargedEvent>>,
    pub on_settlement_completed: Option<Handler<SettlementCompletedEvent>>,
}

impl EventHooks {
    pub fn on_wallet_recharged<F>(&mut self, f: F) -> &mut Self
    where F: (Fn(WalletRechargedEvent) -> Pin<Box<dyn Future<Output = ()> + Send>>) + Send + Sync + 'static {
        self.on_wallet_recharged = Some(Arc::new(f));
        self
    }

    pub fn on_settlement_completed<F>(&mut self, f: F) -> &mut Self
    where F: (Fn(SettlementCompletedEvent) -> Pin<Box<dyn Future<Output = ()> + Send>>) + Send + Sync + 'static {
        self.on_settlement_completed = Some(Arc::new(f));
        self
    }
}
