//! Kubernetes API backed secret source

use async_trait::async_trait;
use k8s_openapi::api::core::v1::{Namespace, Secret};
use kube::api::{ApiResource, DynamicObject, ListParams};
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::{Api, Client};
use tracing::debug;

use crate::adapters::secrets::SecretRecord;
use crate::config::KubeOptions;
use crate::fetcher::SecretSource;
use crate::{Error, Result};

/// Secret source talking to a live cluster
#[derive(Clone)]
pub struct KubeSecretSource {
    client: Client,
}

impl KubeSecretSource {
    /// Wrap an existing client
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Build a client from kubeconfig selection flags
    ///
    /// Without any flags this falls back to the usual kubeconfig / in-cluster
    /// discovery.
    pub async fn connect(options: &KubeOptions) -> Result<Self> {
        let config_options = KubeConfigOptions {
            context: options.context.clone(),
            cluster: options.cluster.clone(),
            user: options.user.clone(),
        };

        let config = match &options.kubeconfig {
            Some(path) => {
                let kubeconfig = Kubeconfig::read_from(path).map_err(|e| {
                    Error::Config(format!(
                        "failed to read kubeconfig {}: {}",
                        path.display(),
                        e
                    ))
                })?;
                kube::Config::from_custom_kubeconfig(kubeconfig, &config_options)
                    .await
                    .map_err(|e| Error::Config(format!("invalid kubeconfig: {}", e)))?
            }
            None if options.is_default() => kube::Config::infer()
                .await
                .map_err(|e| Error::Config(format!("failed to load kubeconfig: {}", e)))?,
            None => kube::Config::from_kubeconfig(&config_options)
                .await
                .map_err(|e| Error::Config(format!("failed to load kubeconfig: {}", e)))?,
        };

        // The context namespace never scopes a query; only --namespace does.
        debug!(
            "Kubeconfig default namespace {:?} is not used implicitly",
            config.default_namespace
        );

        let client = Client::try_from(config)
            .map_err(|e| Error::Config(format!("failed to create Kubernetes client: {}", e)))?;
        Ok(Self::new(client))
    }
}

#[async_trait]
impl SecretSource for KubeSecretSource {
    async fn get_secret(&self, namespace: &str, name: &str) -> kube::Result<SecretRecord> {
        let secrets: Api<Secret> = Api::namespaced(self.client.clone(), namespace);
        let secret = secrets.get(name).await?;
        Ok(SecretRecord::from_typed(secret, namespace))
    }

    async fn list_secrets(
        &self,
        namespace: &str,
        name: Option<&str>,
        label_selector: Option<&str>,
    ) -> kube::Result<Vec<SecretRecord>> {
        let resource = ApiResource::erase::<Secret>(&());
        let secrets: Api<DynamicObject> =
            Api::namespaced_with(self.client.clone(), namespace, &resource);

        let params = list_params(name, label_selector);
        let list = secrets.list(&params).await?;
        Ok(list
            .items
            .into_iter()
            .map(|obj| SecretRecord::from_dynamic(obj, namespace))
            .collect())
    }

    async fn list_namespaces(&self) -> kube::Result<Vec<String>> {
        let namespaces: Api<Namespace> = Api::all(self.client.clone());
        let list = namespaces.list(&ListParams::default()).await?;
        Ok(list
            .items
            .into_iter()
            .filter_map(|ns| ns.metadata.name)
            .collect())
    }
}

/// List parameters for a secret list call
///
/// A secret name becomes a `metadata.name` field selector so a missing
/// secret yields an empty list rather than a 404.
pub fn list_params(name: Option<&str>, label_selector: Option<&str>) -> ListParams {
    let mut params = ListParams::default();
    if let Some(selector) = label_selector {
        params = params.labels(selector);
    }
    if let Some(name) = name {
        params = params.fields(&format!("metadata.name={}", name));
    }
    params
}
