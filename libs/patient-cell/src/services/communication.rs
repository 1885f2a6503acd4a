use anyhow::Result;
use tracing::{debug, info};

use shared_config::AppConfig;
use shared_database::ClinicStore;
use shared_models::clinic::{
    AssessmentStatus, AssessmentUpdate, Communication, CommunicationDirection, NewCommunication,
};

use crate::models::{CommunicationQuery, CreateCommunicationRequest};

pub struct CommunicationService {
    store: ClinicStore,
}

impl CommunicationService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            store: ClinicStore::new(config),
        }
    }

    pub async fn list(&self, query: CommunicationQuery) -> Result<Vec<Communication>> {
        self.store
            .list_communications(query.patient_id, query.assessment_id)
            .await
    }

    /// Records a communication. Reaching out on a new assessment marks it
    /// as contacted.
    pub async fn record(&self, request: CreateCommunicationRequest) -> Result<Communication> {
        let communication = self
            .store
            .create_communication(&NewCommunication {
                patient_id: request.patient_id,
                assessment_id: request.assessment_id,
                channel: request.channel,
                direction: request.direction,
                subject: request.subject.filter(|s| !s.trim().is_empty()),
                message: request.message.trim().to_string(),
                sent_by: request.sent_by,
            })
            .await?;
        debug!("Recorded communication {}", communication.id);

        if let (CommunicationDirection::Outbound, Some(assessment_id)) =
            (communication.direction, communication.assessment_id)
        {
            if let Some(assessment) = self.store.get_assessment(assessment_id).await? {
                if assessment.status == AssessmentStatus::New {
                    self.store
                        .update_assessment(
                            assessment_id,
                            &AssessmentUpdate {
                                status: Some(AssessmentStatus::Contacted),
                                ..Default::default()
                            },
                        )
                        .await?;
                    info!("Assessment {} marked as contacted", assessment_id);
                }
            }
        }

        Ok(communication)
    }
}
