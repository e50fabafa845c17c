//! Permission catalog of a stock Jenkins with the usual plugins installed

use jenkins_core::PermissionDescriptor;

const CATALOG: &[(&str, bool)] = &[
    // Overall
    ("hudson.model.Hudson.Administer", true),
    ("hudson.model.Hudson.Manage", true),
    ("hudson.model.Hudson.Read", true),
    ("hudson.model.Hudson.SystemRead", false),
    ("hudson.model.Hudson.RunScripts", true),
    ("hudson.model.Hudson.UploadPlugins", true),
    ("hudson.model.Hudson.ConfigureUpdateCenter", true),
    // Agents
    ("hudson.model.Computer.Build", true),
    ("hudson.model.Computer.Configure", true),
    ("hudson.model.Computer.Connect", true),
    ("hudson.model.Computer.Create", true),
    ("hudson.model.Computer.Delete", true),
    ("hudson.model.Computer.Disconnect", true),
    ("hudson.model.Computer.ExtendedRead", false),
    // Jobs
    ("hudson.model.Item.Build", true),
    ("hudson.model.Item.Cancel", true),
    ("hudson.model.Item.Configure", true),
    ("hudson.model.Item.Create", true),
    ("hudson.model.Item.Delete", true),
    ("hudson.model.Item.Discover", true),
    ("hudson.model.Item.ExtendedRead", false),
    ("hudson.model.Item.Move", true),
    ("hudson.model.Item.Read", true),
    ("hudson.model.Item.Workspace", true),
    // Runs
    ("hudson.model.Run.Delete", true),
    ("hudson.model.Run.Replay", true),
    ("hudson.model.Run.Update", true),
    // Views
    ("hudson.model.View.Configure", true),
    ("hudson.model.View.Create", true),
    ("hudson.model.View.Delete", true),
    ("hudson.model.View.Read", true),
    // SCM
    ("hudson.scm.SCM.Tag", true),
    // Credentials plugin
    ("com.cloudbees.plugins.credentials.CredentialsProvider.Create", true),
    ("com.cloudbees.plugins.credentials.CredentialsProvider.Delete", true),
    ("com.cloudbees.plugins.credentials.CredentialsProvider.ManageDomains", true),
    ("com.cloudbees.plugins.credentials.CredentialsProvider.Update", true),
    ("com.cloudbees.plugins.credentials.CredentialsProvider.View", true),
    // Lockable resources plugin
    ("org.jenkins.plugins.lockableresources.LockableResourcesManager.Reserve", true),
    ("org.jenkins.plugins.lockableresources.LockableResourcesManager.Unlock", true),
    ("org.jenkins.plugins.lockableresources.LockableResourcesManager.View", true),
    // Generic permissions every group implies
    ("hudson.security.Permission.GenericRead", true),
    ("hudson.security.Permission.GenericWrite", true),
    ("hudson.security.Permission.GenericCreate", true),
    ("hudson.security.Permission.GenericUpdate", true),
    ("hudson.security.Permission.GenericDelete", true),
    ("hudson.security.Permission.FullControl", true),
];

/// Every registered permission, including disabled and non-grantable ones
pub fn default_catalog() -> Vec<PermissionDescriptor> {
    CATALOG
        .iter()
        .map(|(id, enabled)| PermissionDescriptor::new(*id, *enabled))
        .collect()
}
